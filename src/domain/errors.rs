use crate::domain::horizon::Horizon;
use thiserror::Error;

/// Errors in the inference-request contract.
///
/// Everything except `ScoringFailure` is a client-input error: reported
/// immediately, never retried, and always naming the offending column(s).
/// `ScoringFailure` is an internal fault; its diagnostics stay in the server
/// logs and the caller only sees an opaque message.
#[derive(Debug, Error, PartialEq)]
pub enum PredictionError {
    #[error("rows must not be empty")]
    EmptyInput,

    #[error("missing required column: {column}")]
    MissingField { column: String },

    #[error("missing feature columns: {}", .columns.join(", "))]
    MissingFeatureColumns { columns: Vec<String> },

    #[error("invalid timestamp '{value}': expected YYYY-MM-DD")]
    InvalidTimestamp { value: String },

    #[error("non-numeric feature columns: {}", .columns.join(", "))]
    NonNumericFeature { columns: Vec<String> },

    #[error("scoring failed for horizon {horizon}")]
    ScoringFailure { horizon: Horizon },
}

impl PredictionError {
    /// Stable machine-readable kind, used in error responses and as a
    /// metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::EmptyInput => "empty_input",
            PredictionError::MissingField { .. } => "missing_field",
            PredictionError::MissingFeatureColumns { .. } => "missing_feature_columns",
            PredictionError::InvalidTimestamp { .. } => "invalid_timestamp",
            PredictionError::NonNumericFeature { .. } => "non_numeric_feature",
            PredictionError::ScoringFailure { .. } => "scoring_failure",
        }
    }

    /// True for client-input errors (4xx-class). Scoring faults are 5xx.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PredictionError::ScoringFailure { .. })
    }

    /// HTTP-equivalent status class for the transport layer.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}

/// Errors building a `FeatureSchema` from a trained artifact.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("artifact declares no feature columns")]
    Empty,

    #[error("duplicate feature column: {column}")]
    DuplicateColumn { column: String },
}
