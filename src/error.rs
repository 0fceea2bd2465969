use thiserror::Error;

/// Reasons a matched candidate is thrown away during post-processing.
///
/// These never escape the engine: a discarded candidate simply hands control
/// to the next rule in the field's pattern list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("numeric token '{token}' did not parse after separator normalization")]
    UnparseableAmount { token: String },

    #[error("six-digit token '{token}' fails the DDMMYY plausibility check")]
    ImplausibleDate { token: String },
}
