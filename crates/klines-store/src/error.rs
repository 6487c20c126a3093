//! Store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving or loading a container.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The container could not be created, opened or read.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The container path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// No container exists at the path.
    #[error("No container found at '{0}'")]
    NotFound(PathBuf),

    /// The file is not a container, or its labels and data disagree.
    #[error("Corrupt container '{path}': {reason}")]
    Corrupt {
        /// The container path.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// Encoding the table failed.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
