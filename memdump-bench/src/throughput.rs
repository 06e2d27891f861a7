//! Decode throughput over a fixed frame.

use std::fmt;
use std::time::{Duration, Instant};

use memdump_core::{DecodeError, FrameDecoder};

/// Work done by repeated decodes of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeThroughput {
    /// Number of decodes run.
    pub decodes: u32,
    /// Frame bytes scanned, summed over all decodes.
    pub bytes: u64,
    /// Rows produced, summed over all decodes.
    pub rows: u64,
    /// Cells produced, summed over all decodes.
    pub cells: u64,
    /// Wall time of all decodes.
    pub elapsed: Duration,
}

impl DecodeThroughput {
    fn rate(&self, count: u64) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        count as f64 / secs
    }

    /// Returns decoded rows per second.
    #[must_use]
    pub fn rows_per_second(&self) -> f64 {
        self.rate(self.rows)
    }

    /// Returns decoded cells per second.
    #[must_use]
    pub fn cells_per_second(&self) -> f64 {
        self.rate(self.cells)
    }

    /// Returns scanned mebibytes per second.
    #[must_use]
    pub fn mib_per_second(&self) -> f64 {
        self.rate(self.bytes) / (1024.0 * 1024.0)
    }
}

impl fmt::Display for DecodeThroughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} MiB/s, {:.0} rows/s, {:.0} cells/s over {} decodes",
            self.mib_per_second(),
            self.rows_per_second(),
            self.cells_per_second(),
            self.decodes
        )
    }
}

/// Decodes `frame` with `decoder` `decodes` times and totals the output.
///
/// # Errors
/// Returns the [`DecodeError`] of a malformed frame on the first decode.
pub fn measure_decode(
    decoder: &FrameDecoder,
    frame: &[u8],
    decodes: u32,
) -> Result<DecodeThroughput, DecodeError> {
    let mut rows = 0u64;
    let mut cells = 0u64;
    let start = Instant::now();
    for _ in 0..decodes {
        let dataset = decoder.decode(frame)?;
        rows += dataset.height() as u64;
        cells += (dataset.height() * dataset.width()) as u64;
    }
    Ok(DecodeThroughput {
        decodes,
        bytes: frame.len() as u64 * u64::from(decodes),
        rows,
        cells,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::synthetic_frame;

    #[test]
    fn test_measure_totals_dataset_size() {
        let frame = synthetic_frame(4, 250);
        let result = measure_decode(&FrameDecoder::new(), &frame, 3).unwrap();
        assert_eq!(result.decodes, 3);
        assert_eq!(result.rows, 750);
        assert_eq!(result.cells, 3000);
        assert_eq!(result.bytes, 3 * frame.len() as u64);
    }

    #[test]
    fn test_rates() {
        let result = DecodeThroughput {
            decodes: 2,
            bytes: 2 * 1024 * 1024,
            rows: 1000,
            cells: 8000,
            elapsed: Duration::from_secs(2),
        };
        assert!((result.rows_per_second() - 500.0).abs() < 0.001);
        assert!((result.cells_per_second() - 4000.0).abs() < 0.001);
        assert!((result.mib_per_second() - 1.0).abs() < 0.001);
        assert!(result.to_string().starts_with("1.0 MiB/s, 500 rows/s"));
    }

    #[test]
    fn test_zero_elapsed_reports_zero() {
        let result = DecodeThroughput {
            decodes: 0,
            bytes: 0,
            rows: 0,
            cells: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(result.rows_per_second(), 0.0);
    }

    #[test]
    fn test_malformed_frame_is_reported() {
        let result = measure_decode(&FrameDecoder::new(), b"no markers here", 5);
        assert!(matches!(result, Err(DecodeError::MissingLogStart { .. })));
    }
}
