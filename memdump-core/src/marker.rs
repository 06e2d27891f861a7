//! Protocol markers and the marker scanner.
//!
//! A dump frame is delimited by three fixed byte sequences:
//!
//! ```text
//! [log-start  AA 55 FF 00 55 AA]
//! [header     "name;name;..."   ]
//! [values     F0 F0 A5          ]
//! [matrix     u32 LE cells      ]
//! [log-stop   FF 00 55 AA 00 FF]
//! ```

/// A fixed byte sequence delimiting a protocol region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    name: &'static str,
    bytes: &'static [u8],
}

impl Marker {
    /// Creates a marker from a constant byte sequence.
    #[must_use]
    pub const fn new(name: &'static str, bytes: &'static [u8]) -> Self {
        Self { name, bytes }
    }

    /// Returns the marker name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the marker bytes.
    #[must_use]
    pub const fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    /// Returns the marker length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the marker has no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Finds the first occurrence of this marker in `haystack`.
    #[inline]
    #[must_use]
    pub fn find_in(&self, haystack: &[u8]) -> Option<usize> {
        find_first(haystack, self.bytes)
    }
}

/// Marks the beginning of a frame; followed by the column header.
pub const LOG_START: Marker = Marker::new("log-start", &[0xAA, 0x55, 0xFF, 0x00, 0x55, 0xAA]);

/// Ends the column header; followed by the value matrix.
pub const VALUES_START: Marker = Marker::new("values-start", &[0xF0, 0xF0, 0xA5]);

/// Marks the end of the value matrix.
pub const LOG_STOP: Marker = Marker::new("log-stop", &[0xFF, 0x00, 0x55, 0xAA, 0x00, 0xFF]);

/// Returns the offset of the first full occurrence of `needle` in `haystack`.
///
/// Only complete, contiguous matches count, so a marker cut off by the end
/// of a still-growing buffer is not found. An empty needle never matches.
#[must_use]
pub fn find_first(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    find_from(haystack, needle, 0)
}

/// Like [`find_first`], but starts the search at offset `from`.
///
/// The returned offset is absolute within `haystack`.
#[must_use]
pub fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    let (&first, rest) = needle.split_first()?;
    let last_start = haystack.len().checked_sub(needle.len())?;

    let mut pos = from;
    while pos <= last_start {
        // Skip ahead to the next candidate first byte.
        match haystack[pos..=last_start].iter().position(|&b| b == first) {
            Some(skip) => pos += skip,
            None => return None,
        }
        if &haystack[pos + 1..pos + needle.len()] == rest {
            return Some(pos);
        }
        pos += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_lengths() {
        assert_eq!(LOG_START.len(), 6);
        assert_eq!(VALUES_START.len(), 3);
        assert_eq!(LOG_STOP.len(), 6);
        assert!(!LOG_STOP.is_empty());
        assert_eq!(VALUES_START.name(), "values-start");
    }

    #[test]
    fn test_find_first_at_start() {
        let buf = [0xAA, 0x55, 0xFF, 0x00, 0x55, 0xAA, 1, 2];
        assert_eq!(LOG_START.find_in(&buf), Some(0));
    }

    #[test]
    fn test_find_first_returns_earliest() {
        let buf = [9, 0xF0, 0xF0, 0xA5, 7, 0xF0, 0xF0, 0xA5];
        assert_eq!(VALUES_START.find_in(&buf), Some(1));
    }

    #[test]
    fn test_find_first_with_repeated_prefix() {
        // A partial match immediately before the real one must not hide it.
        let buf = [0xF0, 0xF0, 0xF0, 0xA5];
        assert_eq!(VALUES_START.find_in(&buf), Some(1));
    }

    #[test]
    fn test_marker_straddling_end_not_found() {
        let buf = [1, 2, 0xFF, 0x00, 0x55, 0xAA, 0x00];
        assert_eq!(LOG_STOP.find_in(&buf), None);
    }

    #[test]
    fn test_marker_at_exact_end() {
        let buf = [1, 2, 0xFF, 0x00, 0x55, 0xAA, 0x00, 0xFF];
        assert_eq!(LOG_STOP.find_in(&buf), Some(2));
    }

    #[test]
    fn test_absent_and_degenerate_inputs() {
        assert_eq!(find_first(&[], &[1]), None);
        assert_eq!(find_first(&[1, 2, 3], &[]), None);
        assert_eq!(find_first(&[1, 2], &[1, 2, 3]), None);
        assert_eq!(find_first(&[1, 2, 3], &[4]), None);
    }

    #[test]
    fn test_find_from_offset() {
        let buf = [0xF0, 0xF0, 0xA5, 0, 0xF0, 0xF0, 0xA5];
        assert_eq!(find_from(&buf, VALUES_START.bytes(), 1), Some(4));
        assert_eq!(find_from(&buf, VALUES_START.bytes(), 5), None);
        assert_eq!(find_from(&buf, VALUES_START.bytes(), 100), None);
    }
}
