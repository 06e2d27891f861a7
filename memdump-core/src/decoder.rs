//! Frame decoder.
//!
//! This module provides [`FrameDecoder`], which turns a captured buffer into
//! a [`Dataset`]: the header is extracted first, then the value matrix is
//! decoded using the resulting column count.

use crate::buffer::ReadBuffer;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::header::{HeaderRegion, split_columns};
use crate::matrix::{CELL_WIDTH, CellEncoding, decode_matrix};
use crate::progress::{NoProgress, ProgressSink};

/// Decoder configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// How cell bytes are combined into values.
    pub cell_encoding: CellEncoding,
}

/// Decodes dump frames from a captured buffer.
///
/// Decoding is a pure function of the buffer contents: every call scans the
/// buffer from the start and returns a fresh [`Dataset`], so it is safe to
/// call repeatedly while the buffer grows. See
/// [`crate::IncrementalDecoder`] for a variant that skips re-scanning.
///
/// # Example
/// ```
/// use memdump_core::{FrameDecoder, FrameEncoder};
///
/// let bytes = FrameEncoder::new(["X", "Y", "Z"]).row([1, 2, 3]).finish();
/// let dataset = FrameDecoder::new().decode(&bytes).unwrap();
/// assert_eq!(dataset.columns(), ["X", "Y", "Z"]);
/// assert_eq!(dataset.rows()[0].cells(), [1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder {
    config: DecoderConfig,
}

impl FrameDecoder {
    /// Creates a decoder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder with the given configuration.
    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Sets the cell encoding.
    #[must_use]
    pub fn cell_encoding(mut self, encoding: CellEncoding) -> Self {
        self.config.cell_encoding = encoding;
        self
    }

    /// Returns the decoder configuration.
    #[must_use]
    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Decodes the frame in `buffer`.
    ///
    /// # Errors
    /// Returns a [`crate::DecodeError`] if the markers are missing or out of
    /// order. A missing log-stop marker is not an error: the returned
    /// dataset carries the columns, no rows, and is not complete.
    pub fn decode<B: ReadBuffer + ?Sized>(&self, buffer: &B) -> Result<Dataset> {
        self.decode_with_progress(buffer, &mut NoProgress)
    }

    /// Decodes the frame in `buffer`, reporting matrix progress to `progress`.
    ///
    /// # Errors
    /// See [`FrameDecoder::decode`].
    pub fn decode_with_progress<B, P>(&self, buffer: &B, progress: &mut P) -> Result<Dataset>
    where
        B: ReadBuffer + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let bytes = buffer.as_slice();
        let region = HeaderRegion::locate(bytes)?;
        let columns = region.header(bytes).map(split_columns).unwrap_or_default();
        tracing::debug!(
            "Header at {}..{}: {} columns",
            region.header_start(),
            region.values_start(),
            columns.len()
        );

        let matrix = decode_matrix(
            bytes,
            region.values_end(),
            columns.len(),
            CELL_WIDTH,
            self.config.cell_encoding,
            progress,
        )?;

        if !matrix.is_complete() {
            return Ok(Dataset::pending(columns));
        }
        tracing::debug!(
            "Decoded {} rows x {} columns",
            matrix.rows.len(),
            columns.len()
        );
        Ok(Dataset::complete(columns, matrix.rows, matrix.discarded_bytes))
    }
}

/// Decodes `buffer` with the default [`FrameDecoder`].
///
/// # Errors
/// See [`FrameDecoder::decode`].
pub fn decode<B: ReadBuffer + ?Sized>(buffer: &B) -> Result<Dataset> {
    FrameDecoder::new().decode(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use crate::encoder::FrameEncoder;
    use crate::error::DecodeError;
    use crate::marker::{LOG_START, VALUES_START};

    fn sample_frame() -> Vec<u8> {
        FrameEncoder::new(["X", "Y", "Z"])
            .row([1, 2, 3])
            .row([256, 0, 65_535])
            .finish()
    }

    #[test]
    fn test_decode_sample_frame() {
        let dataset = decode(&sample_frame()).unwrap();
        assert_eq!(dataset.columns(), ["X", "Y", "Z"]);
        assert_eq!(
            dataset.rows(),
            [Row::new(vec![1, 2, 3]), Row::new(vec![256, 0, 65_535])]
        );
        assert!(dataset.is_complete());
        assert_eq!(dataset.discarded_bytes(), 0);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let frame = sample_frame();
        let decoder = FrameDecoder::new();
        assert_eq!(decoder.decode(&frame), decoder.decode(&frame));
    }

    #[test]
    fn test_missing_stop_returns_columns_only() {
        let frame = FrameEncoder::new(["A", "B"]).row([1, 2]).open();
        let dataset = decode(&frame).unwrap();
        assert_eq!(dataset.columns(), ["A", "B"]);
        assert_eq!(dataset.height(), 0);
        assert!(!dataset.is_complete());
    }

    #[test]
    fn test_header_error_propagates_unchanged() {
        let mut buf = VALUES_START.bytes().to_vec();
        buf.extend_from_slice(LOG_START.bytes());
        assert_eq!(
            decode(&buf),
            Err(DecodeError::InvalidHeaderRegion {
                log_start_end: 9,
                values_start: 0,
            })
        );
        assert_eq!(
            decode(&Vec::<u8>::new()),
            Err(DecodeError::MissingLogStart { searched: 0 })
        );
    }

    #[test]
    fn test_hundred_byte_region_yields_eight_rows() {
        let frame = FrameEncoder::new(["A", "B", "C"])
            .raw(&[0x11; 100])
            .finish();
        let dataset = decode(&frame).unwrap();
        assert_eq!(dataset.height(), 8);
        assert_eq!(dataset.discarded_bytes(), 4);
    }

    #[test]
    fn test_progress_reaches_total() {
        let frame = FrameEncoder::new(["A"]).raw(&[0u8; 4 * 250]).finish();
        let mut last = (0, 0);
        let mut calls = 0;
        FrameDecoder::new()
            .decode_with_progress(&frame, &mut |c: usize, t: usize| {
                calls += 1;
                last = (c, t);
            })
            .unwrap();
        assert_eq!(calls, 100);
        assert_eq!(last, (250, 250));
    }

    #[test]
    fn test_legacy_signed_encoding() {
        let frame = FrameEncoder::new(["A"]).raw(&[0x80, 0, 0, 0]).finish();
        let unsigned = FrameDecoder::new().decode(&frame).unwrap();
        let legacy = FrameDecoder::new()
            .cell_encoding(CellEncoding::LegacySigned)
            .decode(&frame)
            .unwrap();
        assert_eq!(unsigned.rows()[0].get(0), Some(128));
        assert_eq!(legacy.rows()[0].get(0), Some(-128));
    }

    #[test]
    fn test_monotonic_growth() {
        let full = FrameEncoder::new(["A", "B"])
            .row([1, 2])
            .row([3, 4])
            .row([5, 6])
            .finish();
        let mut previous: Option<Dataset> = None;
        for len in 0..=full.len() {
            let Ok(current) = decode(&full[..len]) else {
                continue;
            };
            if let Some(prev) = &previous {
                assert!(current.height() >= prev.height());
                assert_eq!(&current.rows()[..prev.height()], prev.rows());
            }
            previous = Some(current);
        }
        assert_eq!(previous.map(|d| d.height()), Some(3));
    }
}
