//! Incremental decoding of a growing buffer.
//!
//! [`IncrementalDecoder`] returns exactly what [`FrameDecoder`] would for the
//! same bytes, but remembers marker offsets between calls so that a buffer
//! which only ever grows is not re-scanned from the start each time.

use crate::buffer::ReadBuffer;
use crate::dataset::Dataset;
use crate::decoder::FrameDecoder;
use crate::error::Result;
use crate::header::{HeaderRegion, split_columns};
use crate::marker::{LOG_STOP, find_from};
use crate::matrix::{CELL_WIDTH, decode_until};
use crate::progress::{NoProgress, ProgressSink};

/// Decoder that caches marker offsets across calls on an append-only buffer.
///
/// The buffer passed to successive calls must be the same capture with
/// bytes appended. A shorter buffer is taken as an external reset and
/// clears the cache; any other rewrite requires an explicit [`reset`].
///
/// [`reset`]: IncrementalDecoder::reset
#[derive(Debug, Clone, Default)]
pub struct IncrementalDecoder {
    decoder: FrameDecoder,
    header: Option<HeaderRegion>,
    log_stop: Option<usize>,
    scanned_len: usize,
}

impl IncrementalDecoder {
    /// Creates an incremental decoder using `decoder`'s configuration.
    #[must_use]
    pub fn new(decoder: FrameDecoder) -> Self {
        Self {
            decoder,
            ..Default::default()
        }
    }

    /// Forgets every cached offset.
    pub fn reset(&mut self) {
        self.header = None;
        self.log_stop = None;
        self.scanned_len = 0;
    }

    /// Returns the cached log-stop offset, if the frame is complete.
    #[must_use]
    pub fn log_stop(&self) -> Option<usize> {
        self.log_stop
    }

    /// Decodes `buffer`.
    ///
    /// # Errors
    /// See [`FrameDecoder::decode`].
    pub fn decode<B: ReadBuffer + ?Sized>(&mut self, buffer: &B) -> Result<Dataset> {
        self.decode_with_progress(buffer, &mut NoProgress)
    }

    /// Decodes `buffer`, reporting matrix progress to `progress`.
    ///
    /// # Errors
    /// See [`FrameDecoder::decode`].
    pub fn decode_with_progress<B, P>(&mut self, buffer: &B, progress: &mut P) -> Result<Dataset>
    where
        B: ReadBuffer + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let bytes = buffer.as_slice();
        if bytes.len() < self.scanned_len {
            tracing::debug!(
                "Buffer shrank from {} to {} bytes, resetting",
                self.scanned_len,
                bytes.len()
            );
            self.reset();
        }

        let region = match self.header {
            Some(region) => region,
            None => {
                let region = HeaderRegion::locate(bytes)?;
                self.header = Some(region);
                region
            }
        };
        let columns = region.header(bytes).map(split_columns).unwrap_or_default();

        let log_stop = match self.log_stop {
            Some(offset) => Some(offset),
            None => {
                // A marker may straddle the previous end of the buffer.
                let resume = self.scanned_len.saturating_sub(LOG_STOP.len() - 1);
                let found = find_from(bytes, LOG_STOP.bytes(), resume);
                self.log_stop = found;
                found
            }
        };
        self.scanned_len = bytes.len();

        let Some(log_stop) = log_stop else {
            return Ok(Dataset::pending(columns));
        };
        let matrix = decode_until(
            bytes,
            region.values_end(),
            log_stop,
            columns.len(),
            CELL_WIDTH,
            self.decoder.config().cell_encoding,
            progress,
        )?;
        Ok(Dataset::complete(columns, matrix.rows, matrix.discarded_bytes))
    }
}
