//! Synthetic dump frames.

use memdump_core::FrameEncoder;

/// Builds a complete frame with `columns` columns and `rows` rows.
///
/// Cell values stay below 2^20 so no cell can spell out a marker.
#[must_use]
pub fn synthetic_frame(columns: usize, rows: usize) -> Vec<u8> {
    let names: Vec<String> = (0..columns).map(|c| format!("col{}", c)).collect();
    let mut encoder = FrameEncoder::new(names);
    for r in 0..rows {
        encoder.push_row((0..columns).map(|c| ((r * 31 + c * 7) % 1_000_000) as i64));
    }
    encoder.finish()
}

/// Builds a frame of roughly `bytes` bytes with `columns` columns.
#[must_use]
pub fn frame_of_size(columns: usize, bytes: usize) -> Vec<u8> {
    let row_width = (columns * memdump_core::CELL_WIDTH).max(1);
    synthetic_frame(columns, bytes / row_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_frame_decodes() {
        let frame = synthetic_frame(5, 1000);
        let dataset = memdump_core::decode(&frame).unwrap();
        assert_eq!(dataset.width(), 5);
        assert_eq!(dataset.height(), 1000);
        assert_eq!(dataset.rows()[1].cells(), [31, 38, 45, 52, 59]);
    }

    #[test]
    fn test_frame_of_size() {
        let frame = frame_of_size(4, 16 * 100);
        let dataset = memdump_core::decode(&frame).unwrap();
        assert_eq!(dataset.height(), 100);
    }
}
