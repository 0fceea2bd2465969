use tracing::debug;

use super::patterns::ExtractionRule;

/// Returned when no rule and no line heuristic yields a plausible vendor.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// Words that disqualify a candidate produced by the pattern rules.
const CANDIDATE_STOP_WORDS: &[&str] = &["invoice", "receipt", "bill", "date", "total", "amount"];

/// Words that disqualify a line in the leading-lines heuristic.
const LINE_STOP_WORDS: &[&str] = &[
    "invoice", "receipt", "tax", "date", "total", "amount", "abn", "acn", "gst",
];

/// How many leading lines the heuristic inspects.
const HEURISTIC_LINE_COUNT: usize = 5;

/// How many words of an accepted heuristic line are kept as the vendor name.
const HEURISTIC_WORD_LIMIT: usize = 4;

/// Recover the vendor name, trying each rule in priority order and falling
/// back to a scan of the document's leading lines.
pub fn extract_vendor(rules: &[ExtractionRule], text: &str) -> String {
    for rule in rules {
        if let Some(raw) = rule.first_capture(text) {
            let candidate = collapse_whitespace(raw);
            if accept_candidate(&candidate) {
                debug!("vendor rule matched: '{}'", candidate);
                return candidate;
            }
            // A rejected match is discarded outright, not retried with
            // modification.
            debug!("vendor candidate '{}' rejected, trying next rule", candidate);
        }
    }

    if let Some(vendor) = scan_leading_lines(text) {
        debug!("vendor recovered from leading lines: '{}'", vendor);
        return vendor;
    }

    UNKNOWN_VENDOR.to_string()
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn accept_candidate(candidate: &str) -> bool {
    if candidate.len() <= 3 {
        return false;
    }
    let lower = candidate.to_lowercase();
    !CANDIDATE_STOP_WORDS.iter().any(|word| lower.contains(word))
}

/// Accept the first leading line that looks like a company name rather than
/// invoice boilerplate, truncated to its first few words.
fn scan_leading_lines(text: &str) -> Option<String> {
    for line in text.lines().take(HEURISTIC_LINE_COUNT) {
        let line = line.trim();
        if line.len() <= 3 {
            continue;
        }
        if !line.chars().next().map_or(false, |c| c.is_uppercase()) {
            continue;
        }
        if line.split_whitespace().count() < 2 {
            continue;
        }
        let lower = line.to_lowercase();
        if LINE_STOP_WORDS.iter().any(|word| lower.contains(word)) {
            continue;
        }
        let vendor = line
            .split_whitespace()
            .take(HEURISTIC_WORD_LIMIT)
            .collect::<Vec<_>>()
            .join(" ");
        return Some(vendor);
    }
    None
}
