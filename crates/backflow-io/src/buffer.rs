//! Fixed-capacity byte buffer exchanged between filters.

use std::fmt;

use crate::{Error, Result};

/// Contiguous byte region with an immutable capacity and a variable used length.
///
/// There is no resizing operation. A filter that needs more room reports
/// backpressure to the group instead of growing the buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    data: Box<[u8]>,
    used: usize,
}

impl Buffer {
    /// Allocate a buffer with `capacity` bytes and nothing used.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            used: 0,
        }
    }

    /// Buffer whose capacity and contents are exactly `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            data: bytes.into(),
            used: bytes.len(),
        }
    }

    pub fn capacity(&self) -> usize { self.data.len() }

    pub fn len(&self) -> usize { self.used }

    pub fn is_empty(&self) -> bool { self.used == 0 }

    pub fn is_full(&self) -> bool { self.used == self.data.len() }

    pub fn remaining(&self) -> usize { self.data.len() - self.used }

    pub fn as_slice(&self) -> &[u8] { &self.data[..self.used] }

    /// Reset the used length without reallocating.
    pub fn clear(&mut self) { self.used = 0; }

    /// Append all of `bytes`, failing if they do not fit.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(Error::Capacity {
                requested: bytes.len(),
                remaining: self.remaining(),
            });
        }
        self.append_partial(bytes);
        Ok(())
    }

    /// Append as much of `bytes` as fits and return how many were copied.
    pub fn append_partial(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.remaining());
        self.data[self.used..self.used + n].copy_from_slice(&bytes[..n]);
        self.used += n;
        n
    }

    /// Unused tail of the buffer, for filters that write in place.
    ///
    /// Bytes written here become part of the buffer only after [`Buffer::commit`].
    pub fn spare_mut(&mut self) -> &mut [u8] { &mut self.data[self.used..] }

    /// Mark `n` bytes of the spare region as used.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`Buffer::remaining`]. A filter committing past
    /// capacity is a sizing bug and must not be papered over by truncation.
    pub fn commit(&mut self, n: usize) {
        assert!(
            n <= self.remaining(),
            "buffer overflow: commit of {n} bytes with {} remaining",
            self.remaining()
        );
        self.used += n;
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] { self.as_slice() }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("capacity", &self.capacity())
            .field("used", &self.used)
            .finish()
    }
}
