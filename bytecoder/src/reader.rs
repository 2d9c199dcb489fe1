//! Bounds-checked byte reader for decoding records.

use crate::error::{ByteError, ByteResult};
use crate::COUNTED_MAX_PAYLOAD;

/// A bounds-checked byte-level reader.
///
/// All read operations are checked against the remaining input and return
/// errors on failure. The reader never panics on malformed input.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` over a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> ByteResult<u8> {
        self.ensure(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    /// Reads `len` raw bytes as a subslice of the input.
    pub fn read_bytes(&mut self, len: usize) -> ByteResult<&'a [u8]> {
        self.ensure(len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Reads a little-endian `f32`.
    pub fn read_f32(&mut self) -> ByteResult<f32> {
        let bytes = self.read_array::<4>()?;
        Ok(f32::from_le_bytes(bytes))
    }

    /// Reads a byte-count coded unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns [`ByteError::InvalidCount`] if the count byte exceeds 8, and
    /// [`ByteError::UnexpectedEof`] if the payload is truncated.
    pub fn read_counted_u64(&mut self) -> ByteResult<u64> {
        let count = self.read_u8()?;
        if count as usize > COUNTED_MAX_PAYLOAD {
            return Err(ByteError::InvalidCount {
                count,
                max: COUNTED_MAX_PAYLOAD,
            });
        }
        let payload = self.read_bytes(count as usize)?;
        let mut bytes = [0u8; 8];
        bytes[..payload.len()].copy_from_slice(payload);
        Ok(u64::from_le_bytes(bytes))
    }

    /// Advances the cursor by `len` bytes without interpreting them.
    pub fn skip(&mut self, len: usize) -> ByteResult<()> {
        self.ensure(len)?;
        self.pos += len;
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn ensure(&self, len: usize) -> ByteResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(ByteError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        Ok(())
    }
}
