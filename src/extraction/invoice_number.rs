use tracing::debug;

use super::date::is_plausible_ddmmyy;
use super::patterns::ExtractionRule;

/// Recover the invoice reference, defaulting to an empty string when no
/// candidate survives filtering.
pub fn extract_invoice_number(rules: &[ExtractionRule], text: &str) -> String {
    for rule in rules {
        if let Some(raw) = rule.first_capture(text) {
            let candidate: String = raw.split_whitespace().collect();
            if let Some(reason) = rejection_reason(&candidate) {
                debug!("invoice number candidate '{}' rejected: {}", candidate, reason);
                continue;
            }
            debug!("invoice number rule matched: '{}'", candidate);
            return candidate;
        }
    }
    String::new()
}

/// Why a candidate is not a believable invoice reference, or `None` when it
/// passes. Evaluated in order; the first failure wins.
fn rejection_reason(candidate: &str) -> Option<&'static str> {
    // Six digit runs that read as a date are assumed to be misfired date
    // matches, not invoice numbers.
    if is_plausible_ddmmyy(candidate) {
        return Some("token reads as a DDMMYY date");
    }
    if candidate.chars().all(|c| c.is_alphabetic()) && candidate.len() < 8 {
        return Some("short purely-alphabetic token");
    }
    if candidate.len() < 3 {
        return Some("too short after whitespace stripping");
    }
    None
}
