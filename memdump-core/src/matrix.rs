//! Value matrix decoding.
//!
//! The matrix is a run of fixed-width little-endian cells laid out row by
//! row, terminated by the log-stop marker:
//!
//! ```text
//! +0                    : row 0 [cell 0][cell 1]...[cell n-1]
//! +row_width            : row 1 [cell 0][cell 1]...[cell n-1]
//! ...
//! +rows * row_width     : partial row (discarded)
//! +log_stop             : log-stop (6 bytes)
//! ```

use crate::buffer::ReadBuffer;
use crate::dataset::{Cell, Row};
use crate::error::{DecodeError, Result};
use crate::marker::LOG_STOP;
use crate::progress::{ProgressCoalescer, ProgressSink};

/// Width of one cell in bytes.
pub const CELL_WIDTH: usize = 4;

/// Widest cell that still fits a [`Cell`] without shifting past its bits.
pub const MAX_CELL_WIDTH: usize = 8;

/// How the bytes of a cell are combined into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellEncoding {
    /// Little-endian unsigned integer; every byte is taken as 0-255.
    #[default]
    Unsigned,
    /// Sum of sign-extended bytes shifted into place.
    ///
    /// Reproduces values shown by the legacy desktop viewer, where bytes
    /// with the high bit set contribute negatively.
    LegacySigned,
}

impl CellEncoding {
    /// Decodes one cell from `bytes` (least significant byte first).
    #[inline]
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Cell {
        match self {
            Self::Unsigned => bytes
                .iter()
                .enumerate()
                .fold(0, |acc, (k, &b)| acc | (Cell::from(b) << (8 * k))),
            Self::LegacySigned => bytes
                .iter()
                .enumerate()
                .fold(0, |acc: Cell, (k, &b)| {
                    acc.wrapping_add(Cell::from(b as i8) << (8 * k))
                }),
        }
    }
}

/// Rows decoded from a value region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matrix {
    /// Fully decoded rows, in order.
    pub rows: Vec<Row>,
    /// Offset of the log-stop marker, or `None` if it has not arrived yet.
    pub log_stop: Option<usize>,
    /// Trailing bytes shorter than one row.
    pub discarded_bytes: usize,
}

impl Matrix {
    /// Returns true if the log-stop marker was found.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.log_stop.is_some()
    }
}

/// Decodes the value matrix that starts at `values_end`.
///
/// If the log-stop marker is absent the transfer is still in progress and
/// an empty, incomplete [`Matrix`] is returned.
///
/// # Errors
/// Returns [`DecodeError::InvalidValueRegion`] if log-stop lies before
/// `values_end`, and [`DecodeError::MalformedMatrixDimensions`] if the
/// dimensions cannot describe a row.
pub fn decode_matrix<P: ProgressSink + ?Sized>(
    buffer: &[u8],
    values_end: usize,
    column_count: usize,
    cell_width: usize,
    encoding: CellEncoding,
    progress: &mut P,
) -> Result<Matrix> {
    let Some(log_stop) = LOG_STOP.find_in(buffer) else {
        tracing::debug!("log-stop marker not found yet ({} bytes)", buffer.len());
        return Ok(Matrix::default());
    };
    decode_until(
        buffer,
        values_end,
        log_stop,
        column_count,
        cell_width,
        encoding,
        progress,
    )
}

/// Decodes the value matrix between `values_end` and a known `log_stop`.
///
/// # Errors
/// Returns [`DecodeError::InvalidValueRegion`] if `log_stop` lies before
/// `values_end` or past the end of `buffer`. See also [`decode_matrix`].
pub fn decode_until<P: ProgressSink + ?Sized>(
    buffer: &[u8],
    values_end: usize,
    log_stop: usize,
    column_count: usize,
    cell_width: usize,
    encoding: CellEncoding,
    progress: &mut P,
) -> Result<Matrix> {
    let region = log_stop
        .checked_sub(values_end)
        .and_then(|len| buffer.get_bytes(values_end, len))
        .ok_or(DecodeError::InvalidValueRegion {
            values_end,
            log_stop,
        })?;
    let rows = decode_region(region, column_count, cell_width, encoding, progress)?;
    // Without columns there is no row width, so nothing counts as a partial row.
    let discarded_bytes = match column_count * cell_width {
        0 => 0,
        row_width => region.len() % row_width,
    };
    if discarded_bytes > 0 {
        tracing::debug!("Dropping {} trailing bytes of a partial row", discarded_bytes);
    }
    Ok(Matrix {
        rows,
        log_stop: Some(log_stop),
        discarded_bytes,
    })
}

/// Decodes whole rows from a value region; trailing bytes shorter than a
/// row are ignored.
///
/// # Errors
/// Returns [`DecodeError::MalformedMatrixDimensions`] if the cell width is
/// zero while the region holds data, exceeds [`MAX_CELL_WIDTH`], or the row
/// width overflows.
pub fn decode_region<P: ProgressSink + ?Sized>(
    region: &[u8],
    column_count: usize,
    cell_width: usize,
    encoding: CellEncoding,
    progress: &mut P,
) -> Result<Vec<Row>> {
    if column_count == 0 {
        return Ok(Vec::new());
    }
    let malformed = DecodeError::MalformedMatrixDimensions {
        column_count,
        cell_width,
    };
    if cell_width > MAX_CELL_WIDTH {
        return Err(malformed);
    }
    let row_width = column_count.checked_mul(cell_width).ok_or(malformed.clone())?;
    if row_width == 0 {
        return if region.is_empty() {
            Ok(Vec::new())
        } else {
            Err(malformed)
        };
    }

    let row_count = region.len() / row_width;
    let mut rows = Vec::with_capacity(row_count);
    let mut coalescer = ProgressCoalescer::new(row_count);

    for (i, row_bytes) in region.chunks_exact(row_width).enumerate() {
        let cells = row_bytes
            .chunks_exact(cell_width)
            .map(|cell| encoding.decode(cell))
            .collect();
        rows.push(Row::new(cells));
        coalescer.advance(i + 1, progress);
    }
    Ok(rows)
}
