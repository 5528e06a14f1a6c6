use thiserror::Error;

/// Errors raised while validating input, loading artifacts or running predictions.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Missing required columns. Expected: [{}]", expected.join(", "))]
    MissingColumns {
        expected: Vec<String>,
        missing: Vec<String>,
    },

    #[error("{field} must be a non-negative number, got {value}")]
    InvalidFeature { field: &'static str, value: f64 },

    #[error("Error reading file: {0}")]
    Read(String),

    #[error("feature order mismatch: artifact expects [{}], input provides [{}]", expected.join(", "), found.join(", "))]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("invalid artifact: {0}")]
    Artifact(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectorError {
    /// Wrap any read-side failure as the generic file error shown to users.
    pub fn read(cause: impl std::fmt::Display) -> Self {
        Self::Read(cause.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DetectorError>;
