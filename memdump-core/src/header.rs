//! Column header extraction.
//!
//! The header region lies strictly between the end of the log-start marker
//! and the start of the values-start marker:
//!
//! ```text
//! +0              : log-start     (6 bytes)
//! +6              : column names  (';'-separated text)
//! +values_start   : values-start  (3 bytes)
//! +values_end     : value matrix
//! ```

use crate::buffer::ReadBuffer;
use crate::error::{DecodeError, Result};
use crate::marker::{LOG_START, VALUES_START};

/// Separator between column names in the header region.
pub const COLUMN_SEPARATOR: u8 = b';';

/// Marker offsets delimiting the header region of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRegion {
    log_start: usize,
    values_start: usize,
}

impl HeaderRegion {
    /// Locates the header region in `buffer`.
    ///
    /// # Errors
    /// Returns [`DecodeError::MissingLogStart`] or
    /// [`DecodeError::MissingValuesStart`] if a marker is absent, and
    /// [`DecodeError::InvalidHeaderRegion`] if values-start does not come
    /// strictly after the end of log-start.
    pub fn locate(buffer: &[u8]) -> Result<Self> {
        let log_start = LOG_START
            .find_in(buffer)
            .ok_or(DecodeError::MissingLogStart {
                searched: buffer.len(),
            })?;
        let values_start =
            VALUES_START
                .find_in(buffer)
                .ok_or(DecodeError::MissingValuesStart {
                    searched: buffer.len(),
                })?;
        Self::from_offsets(log_start, values_start)
    }

    /// Validates a pair of marker offsets.
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidHeaderRegion`] if `values_start` is not
    /// strictly greater than the end of the log-start marker.
    pub fn from_offsets(log_start: usize, values_start: usize) -> Result<Self> {
        let log_start_end = log_start.saturating_add(LOG_START.len());
        if values_start <= log_start_end {
            return Err(DecodeError::InvalidHeaderRegion {
                log_start_end,
                values_start,
            });
        }
        Ok(Self {
            log_start,
            values_start,
        })
    }

    /// Returns the offset of the log-start marker.
    #[must_use]
    pub fn log_start(&self) -> usize {
        self.log_start
    }

    /// Returns the offset of the values-start marker.
    #[must_use]
    pub fn values_start(&self) -> usize {
        self.values_start
    }

    /// Returns the offset of the first header byte.
    #[must_use]
    pub fn header_start(&self) -> usize {
        self.log_start + LOG_START.len()
    }

    /// Returns the header length in bytes.
    #[must_use]
    pub fn header_len(&self) -> usize {
        self.values_start - self.header_start()
    }

    /// Returns the offset of the first value-matrix byte.
    #[must_use]
    pub fn values_end(&self) -> usize {
        self.values_start + VALUES_START.len()
    }

    /// Returns the header bytes of `buffer`, or `None` if `buffer` is too
    /// short to hold this region.
    #[must_use]
    pub fn header<'a>(&self, buffer: &'a [u8]) -> Option<&'a [u8]> {
        buffer.get_bytes(self.header_start(), self.header_len())
    }
}

/// Splits a header region into column names.
///
/// Every `;`-separated token is one column, empty tokens included. An empty
/// region yields no columns. Names are decoded as UTF-8, replacing invalid
/// sequences.
#[must_use]
pub fn split_columns(header: &[u8]) -> Vec<String> {
    if header.is_empty() {
        return Vec::new();
    }
    header
        .split(|&b| b == COLUMN_SEPARATOR)
        .map(|token| String::from_utf8_lossy(token).into_owned())
        .collect()
}

/// Extracts the ordered column names of the frame in `buffer`.
///
/// # Errors
/// See [`HeaderRegion::locate`].
pub fn extract_columns(buffer: &[u8]) -> Result<Vec<String>> {
    let region = HeaderRegion::locate(buffer)?;
    Ok(region.header(buffer).map(split_columns).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_prefix(header: &[u8]) -> Vec<u8> {
        let mut buf = LOG_START.bytes().to_vec();
        buf.extend_from_slice(header);
        buf.extend_from_slice(VALUES_START.bytes());
        buf
    }

    #[test]
    fn test_extract_three_columns() {
        let buf = frame_prefix(b"X;Y;Z");
        assert_eq!(extract_columns(&buf).unwrap(), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_extract_with_leading_garbage() {
        let mut buf = vec![0x00, 0x13, 0x37];
        buf.extend(frame_prefix(b"temp;pressure"));
        let region = HeaderRegion::locate(&buf).unwrap();
        assert_eq!(region.log_start(), 3);
        assert_eq!(region.values_start(), 3 + 6 + 13);
        assert_eq!(region.header_len(), 13);
        assert_eq!(region.values_end(), buf.len());
        assert_eq!(extract_columns(&buf).unwrap(), vec!["temp", "pressure"]);
    }

    #[test]
    fn test_header_span_is_relative() {
        // A header longer than the log-start offset must be sliced in full.
        let mut buf = vec![0u8; 40];
        buf.extend(frame_prefix(b"alpha;beta;gamma;delta;epsilon"));
        let columns = extract_columns(&buf).unwrap();
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[4], "epsilon");
    }

    #[test]
    fn test_missing_log_start() {
        let buf = [1u8, 2, 3, 0xF0, 0xF0, 0xA5];
        assert_eq!(
            extract_columns(&buf),
            Err(DecodeError::MissingLogStart { searched: 6 })
        );
    }

    #[test]
    fn test_missing_values_start() {
        let mut buf = LOG_START.bytes().to_vec();
        buf.extend_from_slice(b"A;B");
        assert_eq!(
            extract_columns(&buf),
            Err(DecodeError::MissingValuesStart { searched: 9 })
        );
    }

    #[test]
    fn test_values_start_before_log_start() {
        let mut buf = VALUES_START.bytes().to_vec();
        buf.extend(frame_prefix(b"A"));
        assert_eq!(
            extract_columns(&buf),
            Err(DecodeError::InvalidHeaderRegion {
                log_start_end: 9,
                values_start: 0,
            })
        );
    }

    #[test]
    fn test_values_start_at_log_start_end() {
        let buf = frame_prefix(b"");
        assert_eq!(
            extract_columns(&buf),
            Err(DecodeError::InvalidHeaderRegion {
                log_start_end: 6,
                values_start: 6,
            })
        );
    }

    #[test]
    fn test_region_from_offsets() {
        let region = HeaderRegion::from_offsets(2, 12).unwrap();
        assert_eq!(region.header_start(), 8);
        assert_eq!(region.header_len(), 4);
        assert_eq!(region.values_end(), 15);
        assert!(HeaderRegion::from_offsets(2, 8).is_err());
        assert!(HeaderRegion::from_offsets(10, 3).is_err());
    }

    #[test]
    fn test_region_header_on_short_buffer() {
        let region = HeaderRegion::from_offsets(0, 10).unwrap();
        assert_eq!(region.header(&[0u8; 4]), None);
        let buf = frame_prefix(b"ab;c");
        assert_eq!(region.header(&buf), Some(&b"ab;c"[..]));
    }

    #[test]
    fn test_split_columns_edge_cases() {
        assert!(split_columns(b"").is_empty());
        assert_eq!(split_columns(b"A;;B;"), vec!["A", "", "B", ""]);
        assert_eq!(split_columns(b"solo"), vec!["solo"]);
        assert_eq!(split_columns(&[0xFF, b';', b'x']), vec!["\u{FFFD}", "x"]);
    }
}
