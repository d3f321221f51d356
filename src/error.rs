//! Error types for drift detection

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for drift operations
pub type Result<T> = std::result::Result<T, DriftError>;

/// Main error type for the drift engine
#[derive(Error, Debug)]
pub enum DriftError {
    /// Input could not be read, parsed, or aligned. Aborts the run.
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// A single feature lacks enough valid observations on one side.
    /// The feature is excluded and the run continues.
    #[error(
        "Insufficient data for feature '{feature}': baseline has {baseline}, production has {production} valid values (need {required})"
    )]
    InsufficientData {
        feature: String,
        baseline: usize,
        production: usize,
        required: usize,
    },

    #[error("Failed to write report to {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriftError {
    /// Whether this error aborts the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DriftError::InsufficientData { .. })
    }
}

impl From<polars::error::PolarsError> for DriftError {
    fn from(err: polars::error::PolarsError) -> Self {
        DriftError::DataLoad(err.to_string())
    }
}

impl From<serde_json::Error> for DriftError {
    fn from(err: serde_json::Error) -> Self {
        DriftError::Serialization(err.to_string())
    }
}
