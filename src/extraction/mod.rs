/*!
 * Field extraction from OCR'd invoice text.
 *
 * Four field extractors share one immutable [`PatternLibrary`] and run
 * independently over the same raw text. Rules within a field are tried in
 * priority order; a match that fails post-filtering hands control to the
 * next rule, and a field with no surviving candidate takes its default.
 */

pub mod amount;
pub mod date;
pub mod invoice_number;
pub mod patterns;
pub mod vendor;

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error};

use crate::models::ExtractedRecord;

use self::patterns::{Field, PatternLibrary};

/// Runs every field extractor over the same raw text and assembles the
/// record. Stateless apart from the shared pattern library; cheap to clone
/// and safe to use from multiple threads.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionEngine {
    patterns: &'static PatternLibrary,
}

impl ExtractionEngine {
    pub fn new() -> Self {
        Self { patterns: PatternLibrary::shared() }
    }

    /// Extract all fields from one piece of OCR text.
    ///
    /// Never panics outward: an unexpected failure inside a field extractor
    /// is caught here, logged, and replaced by that field's default with a
    /// diagnostic appended to the record, so callers can tell "nothing
    /// found" apart from "extractor fell over".
    pub fn extract(&self, text: &str) -> ExtractedRecord {
        debug!("extracting fields from {} bytes of OCR text", text.len());

        let mut errors = Vec::new();
        let vendor = guarded(Field::Vendor, &mut errors, vendor::UNKNOWN_VENDOR.to_string(), || {
            self.extract_vendor(text)
        });
        let date = guarded(Field::IssueDate, &mut errors, date::today(), || {
            self.extract_date(text)
        });
        let total = guarded(Field::Total, &mut errors, 0.0, || self.extract_total(text));
        let invoice_number = guarded(Field::InvoiceNumber, &mut errors, String::new(), || {
            self.extract_invoice_number(text)
        });

        ExtractedRecord {
            vendor,
            date,
            total,
            invoice_number,
            raw_text: text.to_string(),
            errors,
        }
    }

    pub fn extract_vendor(&self, text: &str) -> String {
        vendor::extract_vendor(self.patterns.rules_for(Field::Vendor), text)
    }

    pub fn extract_date(&self, text: &str) -> String {
        date::extract_date(self.patterns.rules_for(Field::IssueDate), text)
    }

    pub fn extract_total(&self, text: &str) -> f64 {
        amount::extract_total(self.patterns.rules_for(Field::Total), text)
    }

    pub fn extract_invoice_number(&self, text: &str) -> String {
        invoice_number::extract_invoice_number(self.patterns.rules_for(Field::InvoiceNumber), text)
    }
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Panic boundary around a single field extractor.
fn guarded<T>(
    field: Field,
    errors: &mut Vec<String>,
    fallback: T,
    run: impl FnOnce() -> T,
) -> T {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(value) => value,
        Err(cause) => {
            let detail = describe_panic(cause.as_ref());
            error!("{} extractor failed, falling back to default: {}", field, detail);
            errors.push(format!("{}: {}", field, detail));
            fallback
        }
    }
}

fn describe_panic(cause: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = cause.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message.clone()
    } else {
        "unidentified panic payload".to_string()
    }
}
