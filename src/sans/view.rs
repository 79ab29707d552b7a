//! Bounds-checked access to record bytes.

use thiserror::Error;

/// A span of bytes was requested past the end of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Span of {len} bytes at offset {offset} exceeds the {available} bytes available.")]
pub struct OutOfBounds {
    pub offset: usize,
    pub len: usize,
    pub available: usize,
}

/// A read-only view over the bytes of a record.
#[derive(Debug, Clone, Copy)]
pub struct ByteView<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteView<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], OutOfBounds> {
        offset
            .checked_add(len)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or(OutOfBounds {
                offset,
                len,
                available: self.bytes.len(),
            })
    }

    /// Read the byte at `offset`.
    pub fn byte(&self, offset: usize) -> Result<u8, OutOfBounds> {
        Ok(self.slice(offset, 1)?[0])
    }

    /// Read a big-endian unsigned integer of `width` bytes (at most 8)
    /// starting at `offset`.
    pub fn be_uint(&self, offset: usize, width: usize) -> Result<u64, OutOfBounds> {
        debug_assert!(width <= size_of::<u64>());

        let bytes = self.slice(offset, width)?;
        Ok(bytes.iter().fold(0, |acc, b| (acc << 8) | u64::from(*b)))
    }
}
