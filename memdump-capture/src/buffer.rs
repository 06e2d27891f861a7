//! Append-only capture buffer.

use bytes::BytesMut;
use memdump_core::ReadBuffer;

use crate::protocol::DEFAULT_MEMORY_CAPACITY;

/// Bytes received from the device since the last dump request.
///
/// The buffer only grows until [`CaptureBuffer::clear`] is called; the
/// decoder reads it through [`ReadBuffer`] and never mutates it.
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    data: BytesMut,
    capacity: usize,
}

impl CaptureBuffer {
    /// Creates a buffer sized for a dump of the default memory capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    /// Creates a buffer for a device with `capacity` bytes of memory.
    ///
    /// The capacity drives [`CaptureBuffer::fill_percent`]; the buffer itself
    /// grows past it if the device sends more.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            // Reserve lazily: most captures are far smaller than the device.
            data: BytesMut::with_capacity(capacity.min(64 * 1024)),
            capacity,
        }
    }

    /// Appends received bytes.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Discards everything received so far.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Returns the expected device memory size in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how much of the device memory has arrived, 0 to 100.
    #[must_use]
    pub fn fill_percent(&self) -> u8 {
        memdump_core::progress::percent(self.data.len(), self.capacity)
    }

    /// Returns a copy of the captured bytes.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadBuffer for CaptureBuffer {
    fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memdump_core::{FrameDecoder, FrameEncoder};

    #[test]
    fn test_extend_and_clear() {
        let mut buffer = CaptureBuffer::with_capacity(100);
        buffer.extend(&[1, 2, 3]);
        buffer.extend(&[4]);
        assert_eq!(buffer.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(ReadBuffer::len(&buffer), 4);
        buffer.clear();
        assert!(ReadBuffer::is_empty(&buffer));
    }

    #[test]
    fn test_fill_percent() {
        let mut buffer = CaptureBuffer::with_capacity(200);
        assert_eq!(buffer.fill_percent(), 0);
        buffer.extend(&[0u8; 50]);
        assert_eq!(buffer.fill_percent(), 25);
        buffer.extend(&[0u8; 500]);
        assert_eq!(buffer.fill_percent(), 100);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(CaptureBuffer::default().capacity(), 32 * 1024 * 1024);
    }

    #[test]
    fn test_decodes_through_read_buffer() {
        let frame = FrameEncoder::new(["A", "B"]).row([1, 2]).finish();
        let mut buffer = CaptureBuffer::new();
        let (head, tail) = frame.split_at(10);
        buffer.extend(head);
        assert!(FrameDecoder::new().decode(&buffer).is_err());
        buffer.extend(tail);
        let dataset = FrameDecoder::new().decode(&buffer).unwrap();
        assert_eq!(dataset.rows()[0].cells(), [1, 2]);
    }
}
