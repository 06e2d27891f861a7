//! Error types for export operations.

use thiserror::Error;

/// Error type for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error while writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The export options cannot produce a readable file.
    #[error("invalid export options: {message}")]
    InvalidOptions {
        /// Error message.
        message: String,
    },
}

impl ExportError {
    /// Creates an invalid options error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
