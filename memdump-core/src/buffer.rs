//! Read-only view over a captured byte buffer.
//!
//! The decoder never owns or mutates the capture. Anything that can expose
//! its bytes as a contiguous slice implements [`ReadBuffer`] and can be
//! handed to [`crate::FrameDecoder`].

/// Trait for read-only access to a captured byte buffer.
pub trait ReadBuffer {
    /// Returns the buffer as a byte slice.
    fn as_slice(&self) -> &[u8];

    /// Returns the length of the buffer in bytes.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a slice of bytes at the given offset and length, or `None`
    /// if the range extends past the end of the buffer.
    #[inline]
    fn get_bytes(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.as_slice().get(offset..end)
    }
}

impl ReadBuffer for [u8] {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> ReadBuffer for [u8; N] {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl ReadBuffer for Vec<u8> {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl<B: ReadBuffer + ?Sized> ReadBuffer for &B {
    #[inline(always)]
    fn as_slice(&self) -> &[u8] {
        (**self).as_slice()
    }
}
