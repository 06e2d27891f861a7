//! Frame encoder.
//!
//! Builds the byte image a device sends for a dump: useful for simulated
//! devices, fixtures and benchmarks.

use crate::dataset::Cell;
use crate::header::COLUMN_SEPARATOR;
use crate::marker::{LOG_START, LOG_STOP, VALUES_START};
use crate::matrix::CELL_WIDTH;

/// Builder for a complete or partial dump frame.
///
/// # Example
/// ```
/// use memdump_core::{FrameEncoder, decode};
///
/// let bytes = FrameEncoder::new(["X", "Y"])
///     .row([1, 2])
///     .row([3, 4])
///     .finish();
/// let dataset = decode(&bytes).unwrap();
/// assert_eq!(dataset.height(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    columns: Vec<String>,
    values: Vec<u8>,
}

impl FrameEncoder {
    /// Creates an encoder for the given column names.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            values: Vec::new(),
        }
    }

    /// Appends one row of cells, each truncated to its low 32 bits.
    #[must_use]
    pub fn row<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        self.push_row(cells);
        self
    }

    /// Appends one row of cells in place.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Cell>,
    {
        for cell in cells {
            self.values.extend_from_slice(&(cell as u32).to_le_bytes());
        }
    }

    /// Appends raw bytes to the value region, e.g. a partial row.
    #[must_use]
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.values.extend_from_slice(bytes);
        self
    }

    /// Returns the number of bytes written to the value region so far.
    #[must_use]
    pub fn values_len(&self) -> usize {
        self.values.len()
    }

    /// Returns the size of one encoded row in bytes.
    #[must_use]
    pub fn row_width(&self) -> usize {
        self.columns.len() * CELL_WIDTH
    }

    /// Encodes log-start, header, values-start and the value region,
    /// without the log-stop marker.
    #[must_use]
    pub fn open(&self) -> Vec<u8> {
        let header_len: usize = self.columns.iter().map(|c| c.len() + 1).sum();
        let mut out = Vec::with_capacity(
            LOG_START.len() + header_len + VALUES_START.len() + self.values.len() + LOG_STOP.len(),
        );
        out.extend_from_slice(LOG_START.bytes());
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push(COLUMN_SEPARATOR);
            }
            out.extend_from_slice(column.as_bytes());
        }
        out.extend_from_slice(VALUES_START.bytes());
        out.extend_from_slice(&self.values);
        out
    }

    /// Encodes the full frame, terminated by the log-stop marker.
    #[must_use]
    pub fn finish(&self) -> Vec<u8> {
        let mut out = self.open();
        out.extend_from_slice(LOG_STOP.bytes());
        out
    }
}
