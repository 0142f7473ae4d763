//! Error types for log writing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing validation logs.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to write a log file.
    #[error("failed to write log {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for log writing.
pub type Result<T> = std::result::Result<T, ReportError>;
