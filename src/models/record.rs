use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured fields recovered from one piece of OCR text.
///
/// Every field is always populated: extractors substitute their defaults
/// ("Unknown Vendor", the current date, `0.0`, the empty string) when nothing
/// plausible is found. The record is immutable once built; persistence layers
/// may decorate it with identifiers and timestamps on their side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub vendor: String,
    /// Issue date in DD/MM/YYYY form.
    pub date: String,
    pub total: f64,
    /// Empty when no plausible reference survived filtering.
    pub invoice_number: String,
    /// Echo of the input so callers can audit what the fields came from.
    pub raw_text: String,
    /// One entry per field that fell back to its default after an unexpected
    /// extractor failure. Empty in normal operation, including when fields
    /// simply found no match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ExtractedRecord {
    /// Flat key/value view for persistence and API layers.
    ///
    /// The total is rendered with two decimal places so downstream consumers
    /// never see a bare `99` where money is expected.
    pub fn to_field_map(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("vendor", self.vendor.clone()),
            ("date", self.date.clone()),
            ("total", format!("{:.2}", self.total)),
            ("invoice_number", self.invoice_number.clone()),
            ("raw_text", self.raw_text.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractedRecord {
        ExtractedRecord {
            vendor: "Acme Supplies".to_string(),
            date: "05/03/2024".to_string(),
            total: 99.0,
            invoice_number: "00123456".to_string(),
            raw_text: "Acme Supplies\nTotal: 99.00".to_string(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn field_map_renders_total_with_two_decimals() {
        let map = sample().to_field_map();
        assert_eq!(map["total"], "99.00");
        assert_eq!(map["vendor"], "Acme Supplies");
        assert_eq!(map["invoice_number"], "00123456");
        assert_eq!(map.len(), 5, "field map should expose exactly the five contract keys");
    }

    #[test]
    fn clean_records_serialize_without_an_errors_key() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("\"errors\""), "errors should be omitted when empty: {}", json);
    }

    #[test]
    fn diagnostics_survive_a_serde_round_trip() {
        let mut record = sample();
        record.errors.push("vendor: boom".to_string());
        let json = serde_json::to_string(&record).unwrap();
        let back: ExtractedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
