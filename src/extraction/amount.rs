use tracing::debug;

use crate::error::ExtractionError;

use super::patterns::ExtractionRule;

/// Recover the invoice total, defaulting to `0.0` when no pattern yields a
/// parseable numeral.
pub fn extract_total(rules: &[ExtractionRule], text: &str) -> f64 {
    for rule in rules {
        if let Some(candidate) = rule.first_capture(text) {
            match normalize_number(candidate) {
                Ok(value) => {
                    debug!("amount token '{}' normalized to {}", candidate, value);
                    return value;
                }
                // Parse failure discards the candidate; the next pattern gets
                // its chance instead of aborting the field.
                Err(err) => debug!("amount candidate rejected: {}", err),
            }
        }
    }
    0.0
}

/// Disambiguate thousands and decimal separators in a matched numeral and
/// parse it.
///
/// Decision table, applied after stripping embedded whitespace:
/// - both `,` and `.` present: whichever occurs last is the decimal
///   separator; the other is grouping and is removed.
/// - only `,` present: decimal iff exactly two digits follow the last `,`,
///   otherwise grouping.
/// - only `.` present, or neither: used as-is.
pub(crate) fn normalize_number(token: &str) -> Result<f64, ExtractionError> {
    let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();

    let normalized = match (compact.rfind(','), compact.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => compact.replace(',', ""),
        (Some(comma), None) => {
            if compact.len() - comma - 1 == 2 {
                compact.replace(',', ".")
            } else {
                compact.replace(',', "")
            }
        }
        _ => compact.clone(),
    };

    normalized
        .parse::<f64>()
        .map_err(|_| ExtractionError::UnparseableAmount { token: token.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::patterns::{Field, PatternLibrary};

    fn extract(text: &str) -> f64 {
        extract_total(PatternLibrary::shared().rules_for(Field::Total), text)
    }

    #[test]
    fn european_grouping_is_disambiguated() {
        assert_eq!(normalize_number("1.234,56").unwrap(), 1234.56);
    }

    #[test]
    fn anglo_grouping_is_disambiguated() {
        assert_eq!(normalize_number("1,234.56").unwrap(), 1234.56);
    }

    #[test]
    fn lone_comma_with_two_trailing_digits_is_decimal() {
        assert_eq!(normalize_number("1,23").unwrap(), 1.23);
        assert_eq!(normalize_number("1250,00").unwrap(), 1250.0);
    }

    #[test]
    fn lone_comma_without_two_trailing_digits_is_grouping() {
        assert_eq!(normalize_number("12,345").unwrap(), 12345.0);
        assert_eq!(normalize_number("1,234,567").unwrap(), 1234567.0);
    }

    #[test]
    fn embedded_spaces_are_stripped_before_disambiguation() {
        assert_eq!(normalize_number("1 234,56").unwrap(), 1234.56);
    }

    #[test]
    fn garbage_numerals_are_reported_not_panicked() {
        assert!(matches!(
            normalize_number(".."),
            Err(ExtractionError::UnparseableAmount { .. })
        ));
    }

    #[test]
    fn labeled_totals_are_preferred() {
        assert_eq!(extract("Total: 1.234,56"), 1234.56);
        assert_eq!(extract("Grand Total: 99.00"), 99.0);
        assert_eq!(extract("Total: $1,234.56"), 1234.56);
    }

    #[test]
    fn currency_prefixed_numerals_are_a_fallback() {
        assert_eq!(extract("please remit $49.95 promptly"), 49.95);
    }

    #[test]
    fn currency_suffixed_numerals_are_a_fallback() {
        assert_eq!(extract("pay 120.00 AUD on receipt"), 120.0);
        assert_eq!(extract("forty remit 35.50 dollars"), 35.5);
    }

    #[test]
    fn one_garbled_token_between_label_and_numeral_is_tolerated() {
        // OCR read the currency symbol as a letter.
        assert_eq!(extract("Total: S 123.45"), 123.45);
    }

    #[test]
    fn text_without_amounts_yields_zero() {
        assert_eq!(extract("no money mentioned here"), 0.0);
        assert_eq!(extract(""), 0.0);
    }
}
