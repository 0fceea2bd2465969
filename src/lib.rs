/*!
 * billscan - recovers structured invoice fields from raw OCR text.
 *
 * The recognition model that turns a scanned image into text is an external
 * collaborator; this crate consumes a single string and produces an
 * [`ExtractedRecord`] with the vendor name, issue date, total amount and
 * invoice number. Extraction is best-effort and always terminates: fields
 * that cannot be recovered take defined defaults instead of failing.
 */

pub mod error;
pub mod extraction;
pub mod models;

pub use error::ExtractionError;
pub use extraction::ExtractionEngine;
pub use models::ExtractedRecord;
