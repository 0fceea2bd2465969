use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::error::ExtractionError;

use super::patterns::ExtractionRule;

/// Output shape of every extracted date.
pub const OUTPUT_FORMAT: &str = "%d/%m/%Y";

/// Recover the issue date as `DD/MM/YYYY`, defaulting to the current local
/// date when no pattern yields a usable token.
pub fn extract_date(rules: &[ExtractionRule], text: &str) -> String {
    extract_date_or(rules, text, Local::now().date_naive())
}

/// Same as [`extract_date`] with an explicit fallback date, so the default
/// path stays deterministic under test.
pub(crate) fn extract_date_or(rules: &[ExtractionRule], text: &str, fallback: NaiveDate) -> String {
    for rule in rules {
        // Candidates are scanned in document order; an implausible token
        // falls through to the next candidate of the same rule rather than
        // terminating it.
        for candidate in rule.captures(text) {
            match normalize(candidate) {
                Ok(date) => {
                    debug!("date token '{}' normalized to '{}'", candidate, date);
                    return date;
                }
                Err(err) => debug!("date candidate rejected: {}", err),
            }
        }
    }
    fallback.format(OUTPUT_FORMAT).to_string()
}

/// Current local date in the output shape, used as the orchestrator-level
/// default for the date field.
pub(crate) fn today() -> String {
    Local::now().date_naive().format(OUTPUT_FORMAT).to_string()
}

/// Canonicalize a matched date token.
///
/// Decision table, keyed on token shape:
/// - 6 contiguous digits: `DDMMYY` with a plausibility check on day/month.
/// - 10 characters with a separator at index 4: `YYYY-MM-DD` or `YYYY/MM/DD`.
/// - any other 3-part `/`- or `-`-separated token: `DD/MM/YYYY`, 2-digit
///   years expanded with a `20` prefix.
/// - anything else: returned verbatim.
pub(crate) fn normalize(token: &str) -> Result<String, ExtractionError> {
    let token = token.trim();

    if token.len() == 6 && token.bytes().all(|b| b.is_ascii_digit()) {
        if !is_plausible_ddmmyy(token) {
            return Err(ExtractionError::ImplausibleDate { token: token.to_string() });
        }
        return Ok(format!("{}/{}/20{}", &token[..2], &token[2..4], &token[4..]));
    }

    if token.len() == 10 && matches!(token.as_bytes()[4], b'-' | b'/') {
        let parts: Vec<&str> = token.split(['-', '/']).collect();
        if parts.len() == 3 {
            return Ok(format!("{:0>2}/{:0>2}/{}", parts[2], parts[1], parts[0]));
        }
    }

    if token.contains('/') || token.contains('-') {
        let parts: Vec<&str> = token.split(['-', '/']).collect();
        if parts.len() == 3 {
            let year = if parts[2].len() == 2 {
                format!("20{}", parts[2])
            } else {
                parts[2].to_string()
            };
            return Ok(format!("{:0>2}/{:0>2}/{}", parts[0], parts[1], year));
        }
    }

    Ok(token.to_string())
}

/// Whether a 6-digit run reads as a DDMMYY date: first two digits at most 31,
/// next two at most 12. Shared with the invoice-number post-filter, which
/// uses it to throw away misfired date matches.
pub(crate) fn is_plausible_ddmmyy(token: &str) -> bool {
    if token.len() != 6 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let day: u32 = token[..2].parse().unwrap_or(0);
    let month: u32 = token[2..4].parse().unwrap_or(0);
    day <= 31 && month <= 12
}
