use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// One candidate pattern in a field's rule list, together with the capture
/// group that holds the value.
#[derive(Debug)]
pub struct ExtractionRule {
    pattern: Regex,
    group: usize,
}

impl ExtractionRule {
    fn new(pattern: &str, group: usize) -> Self {
        // Every rule matches case-insensitively and treats ^/$ as line anchors.
        let pattern = Regex::new(&format!("(?im){}", pattern))
            .expect("extraction rule pattern should be valid");
        Self { pattern, group }
    }

    /// First capture of this rule in `text`, if any.
    pub fn first_capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(self.group))
            .map(|m| m.as_str())
    }

    /// Every capture of this rule in `text`, in document order.
    pub fn captures<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(self.group).map(|m| m.as_str()))
            .collect()
    }
}

/// Field addressed by a rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Vendor,
    IssueDate,
    Total,
    InvoiceNumber,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vendor => write!(f, "vendor"),
            Self::IssueDate => write!(f, "date"),
            Self::Total => write!(f, "total"),
            Self::InvoiceNumber => write!(f, "invoice_number"),
        }
    }
}

static SHARED: Lazy<PatternLibrary> = Lazy::new(PatternLibrary::new);

/// Ordered rule lists for every extracted field.
///
/// Order is load-bearing: tight label-anchored patterns come first and the
/// loose patterns behind them exist only as fallbacks for when the tight ones
/// fail. The ordering was tuned against real scanned invoices; reordering
/// changes which of several plausible matches wins and needs new fixtures.
#[derive(Debug)]
pub struct PatternLibrary {
    vendor: Vec<ExtractionRule>,
    issue_date: Vec<ExtractionRule>,
    total: Vec<ExtractionRule>,
    invoice_number: Vec<ExtractionRule>,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self {
            vendor: vec![
                // Label-anchored: "From:", "Vendor:", "Seller:", "Bill To:".
                ExtractionRule::new(
                    r"(?:from|vendor|seller|bill\s+to)\s*[:\-]?\s*([A-Z][A-Za-z0-9&.,'\- ]+)",
                    1,
                ),
                // Company name in capitals at the very top of the document.
                ExtractionRule::new(r"\A\s*([A-Z][A-Z0-9&.,'\- ]{3,})$", 1),
                // Generic multi-word title-case phrase anywhere in the text.
                ExtractionRule::new(r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)+)", 1),
            ],
            issue_date: vec![
                // Label-anchored day-first date: "Date: 05/03/2024".
                ExtractionRule::new(
                    r"(?:date|dated|issued)\s*[:\-]?\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})\b",
                    1,
                ),
                // Bare day-first token.
                ExtractionRule::new(r"\b(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})\b", 1),
                // Bare year-first token.
                ExtractionRule::new(r"\b(\d{4}[/\-]\d{1,2}[/\-]\d{1,2})\b", 1),
                // Compressed DDMMYY run, e.g. 281125.
                ExtractionRule::new(r"\b(\d{6})\b", 1),
            ],
            total: vec![
                // Label-anchored amount with two decimal digits; embedded
                // spaces inside the numeral are tolerated.
                ExtractionRule::new(
                    r"(?:grand\s+total|sub\s?total|total|amount|sum|balance|due)\s*[:\-]?\s*(?:[$€£]\s*)?([\d., ]*\d[.,]\s?\d{2})",
                    1,
                ),
                // Currency-symbol prefixed numeral.
                ExtractionRule::new(r"\$\s*(\d[\d.,]*)", 1),
                // Numeral qualified by a currency code or the word "dollars".
                ExtractionRule::new(r"(\d[\d.,]*)\s*(?:[A-Z]{3}\b|dollars\b)", 1),
                // Noise-tolerant label match: one short garbled token may sit
                // between the label and the numeral.
                ExtractionRule::new(
                    r"(?:grand\s+total|sub\s?total|total|amount|sum|balance|due)\s*[:\-]?\s*[^\s\d]{1,4}\s*([\d., ]*\d[.,]\s?\d{2})",
                    1,
                ),
            ],
            invoice_number: vec![
                // Label-anchored digit run of at least six digits, tolerating
                // OCR spacing between digits.
                ExtractionRule::new(
                    r"(?:invoice|inv|bill|receipt|rept)\.?\s*(?:number|num|no)?\.?\s*[#:\-]?\s*(\d(?: ?\d){5,})",
                    1,
                ),
                // Label-anchored alphanumeric code such as INV-2024-001.
                ExtractionRule::new(
                    r"(?:invoice|inv|bill|receipt|rept)\.?\s*(?:number|num|no)?\.?\s*[#:\-]?\s*([A-Za-z]{2,}[\d\-]{3,})",
                    1,
                ),
                // Bare hash reference.
                ExtractionRule::new(r"#\s*(\d{6,})", 1),
                // Bare "NO 123456" reference.
                ExtractionRule::new(r"\bno\.?\s*[:\-]?\s*(\d{6,})", 1),
            ],
        }
    }

    /// Process-wide library, compiled once on first use.
    pub fn shared() -> &'static PatternLibrary {
        &SHARED
    }

    pub fn rules_for(&self, field: Field) -> &[ExtractionRule] {
        match field {
            Field::Vendor => &self.vendor,
            Field::IssueDate => &self.issue_date,
            Field::Total => &self.total,
            Field::InvoiceNumber => &self.invoice_number,
        }
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_a_non_empty_rule_list() {
        let library = PatternLibrary::shared();
        for field in [Field::Vendor, Field::IssueDate, Field::Total, Field::InvoiceNumber] {
            assert!(
                !library.rules_for(field).is_empty(),
                "field {} should carry at least one rule",
                field
            );
        }
    }

    #[test]
    fn rules_capture_the_value_group_not_the_label() {
        let library = PatternLibrary::shared();
        let rule = &library.rules_for(Field::IssueDate)[0];
        assert_eq!(rule.first_capture("Date: 05/03/2024"), Some("05/03/2024"));
    }

    #[test]
    fn captures_are_returned_in_document_order() {
        let library = PatternLibrary::shared();
        let six_digit = library.rules_for(Field::IssueDate).last().unwrap();
        assert_eq!(six_digit.captures("ref 999999 then 281125"), vec!["999999", "281125"]);
    }

    #[test]
    fn rules_match_case_insensitively() {
        let library = PatternLibrary::shared();
        let labeled = &library.rules_for(Field::IssueDate)[0];
        assert_eq!(labeled.first_capture("DATE: 1/2/23"), Some("1/2/23"));
        assert_eq!(labeled.first_capture("date 1/2/23"), Some("1/2/23"));
    }
}
