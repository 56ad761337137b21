// src/error.rs
use tally_core::{ConfigError, ReportError};
use tally_source::SourceError;
use thiserror::Error;

/// Everything that can go wrong between reading a report document and
/// holding a finished pagination.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Report failed: {0}")]
    Report(#[from] ReportError),

    #[error("Row data is invalid: {0}")]
    Source(#[from] SourceError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for DocumentError {
    fn from(e: ConfigError) -> Self {
        DocumentError::Report(ReportError::Config(e))
    }
}
