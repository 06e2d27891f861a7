//! Error types for frame decoding.

use thiserror::Error;

/// Error returned when a buffer cannot be decoded into a dataset.
///
/// Every variant is a deterministic parsing failure: re-decoding the same
/// bytes yields the same error. An absent log-stop marker is not an error,
/// it means the transfer is still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The log-start marker does not occur in the buffer.
    #[error("log-start marker not found in {searched} bytes")]
    MissingLogStart {
        /// Number of bytes searched.
        searched: usize,
    },

    /// The values-start marker does not occur in the buffer.
    #[error("values-start marker not found in {searched} bytes")]
    MissingValuesStart {
        /// Number of bytes searched.
        searched: usize,
    },

    /// The values-start marker does not follow the log-start marker.
    #[error(
        "invalid header region: values-start at offset {values_start} does not follow log-start end at offset {log_start_end}"
    )]
    InvalidHeaderRegion {
        /// Offset of the first byte after the log-start marker.
        log_start_end: usize,
        /// Offset of the values-start marker.
        values_start: usize,
    },

    /// The log-stop marker precedes the end of the values-start marker.
    #[error(
        "invalid value region: log-stop at offset {log_stop} precedes values end at offset {values_end}"
    )]
    InvalidValueRegion {
        /// Offset of the first byte after the values-start marker.
        values_end: usize,
        /// Offset of the log-stop marker.
        log_stop: usize,
    },

    /// Column count and cell width do not describe a usable row.
    #[error("malformed matrix dimensions: {column_count} columns of {cell_width} bytes")]
    MalformedMatrixDimensions {
        /// Number of columns.
        column_count: usize,
        /// Cell width in bytes.
        cell_width: usize,
    },
}

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
