//! Error types for capture operations.

use memdump_core::DecodeError;
use thiserror::Error;

/// Error type for capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// IO error on the underlying stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The serial port could not be opened or enumerated.
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// The device closed the stream.
    #[error("connection closed")]
    ConnectionClosed,

    /// The captured buffer could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Result type alias for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;
