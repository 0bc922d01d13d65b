//! Error types for the Solarium library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Solarium operations.
#[derive(Debug, Error)]
pub enum SolariumError {
    /// Error reading, creating, or replacing a file.
    #[error("File access error for '{path}': {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A caller-supplied parameter is out of range, names an unknown
    /// column, or asks a column for a capability it does not have.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An operation was called before the state it depends on exists.
    #[error("State error: {0}")]
    State(String),

    /// Empty file or no data to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SolariumError {
    /// Shorthand for the file-access variant.
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SolariumError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for an unknown-column parameter error.
    pub fn unknown_column(column: &str) -> Self {
        SolariumError::InvalidParameter(format!("column '{column}' not found"))
    }
}

/// Result type alias for Solarium operations.
pub type Result<T> = std::result::Result<T, SolariumError>;
