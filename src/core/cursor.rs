//! Bounds-aware byte cursor
//!
//! [`ByteCursor`] walks a borrowed byte slice with a single read offset and a
//! byte order chosen once per decode. Reads past the end fail with
//! [`MetaError::TruncatedData`] instead of panicking, so every decoder can
//! turn a short buffer into a warning.

use crate::core::error::{MetaError, MetaResult};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order applied to multi-byte reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// "Intel" order (`II`)
    LittleEndian,
    /// "Motorola" order (`MM`)
    #[default]
    BigEndian,
}

/// A positioned reader over a fixed byte buffer
///
/// The offset always stays within `[0, data.len()]`.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
    endianness: Endianness,
}

impl<'a> ByteCursor<'a> {
    /// Create a big-endian cursor at offset 0
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_endianness(data, Endianness::BigEndian)
    }

    /// Create a cursor at offset 0 with the given byte order
    pub fn with_endianness(data: &'a [u8], endianness: Endianness) -> Self {
        Self {
            data,
            offset: 0,
            endianness,
        }
    }

    /// Current read offset
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Number of bytes between the offset and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Byte order used for multi-byte reads
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Change the byte order for all following reads
    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    /// Move the offset to an absolute position
    pub fn seek(&mut self, offset: usize) -> MetaResult<()> {
        if offset > self.data.len() {
            return Err(MetaError::OutOfRange {
                offset,
                len: self.data.len(),
            });
        }
        self.offset = offset;
        Ok(())
    }

    /// Advance the offset by `count` bytes
    pub fn skip(&mut self, count: usize) -> MetaResult<()> {
        self.ensure(count)?;
        self.offset += count;
        Ok(())
    }

    /// Borrow the next `count` bytes without advancing
    pub fn peek_bytes(&self, count: usize) -> MetaResult<&'a [u8]> {
        self.ensure(count)?;
        Ok(&self.data[self.offset..self.offset + count])
    }

    /// Borrow the next `count` bytes and advance past them
    pub fn read_bytes(&mut self, count: usize) -> MetaResult<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.offset += count;
        Ok(bytes)
    }

    /// Borrow everything from the offset to the end of the buffer
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    /// Read an unsigned integer of `width` bytes (1 to 8)
    ///
    /// When `peek` is set the offset is left untouched.
    pub fn read_uint(&mut self, width: usize, peek: bool) -> MetaResult<u64> {
        if width == 0 || width > 8 {
            return Err(MetaError::malformed(format!(
                "unsupported integer width {width}"
            )));
        }
        let bytes = self.peek_bytes(width)?;
        let value = match self.endianness {
            Endianness::LittleEndian => LittleEndian::read_uint(bytes, width),
            Endianness::BigEndian => BigEndian::read_uint(bytes, width),
        };
        if !peek {
            self.offset += width;
        }
        Ok(value)
    }

    /// Read bytes up to a zero terminator
    ///
    /// The terminator is consumed but not part of the returned slice. Fails
    /// with [`MetaError::TruncatedData`] when the buffer ends first.
    pub fn read_string(&mut self, peek: bool) -> MetaResult<&'a [u8]> {
        let rest = self.rest();
        let Some(end) = rest.iter().position(|&b| b == 0) else {
            return Err(MetaError::TruncatedData {
                offset: self.offset,
                needed: rest.len() + 1,
                available: rest.len(),
            });
        };
        if !peek {
            self.offset += end + 1;
        }
        Ok(&rest[..end])
    }

    /// Read a u8
    pub fn read_u8(&mut self) -> MetaResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read an i8
    pub fn read_i8(&mut self) -> MetaResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a u16 in the cursor's byte order
    pub fn read_u16(&mut self) -> MetaResult<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(match self.endianness {
            Endianness::LittleEndian => LittleEndian::read_u16(bytes),
            Endianness::BigEndian => BigEndian::read_u16(bytes),
        })
    }

    /// Read an i16 in the cursor's byte order
    pub fn read_i16(&mut self) -> MetaResult<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read a u32 in the cursor's byte order
    pub fn read_u32(&mut self) -> MetaResult<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(match self.endianness {
            Endianness::LittleEndian => LittleEndian::read_u32(bytes),
            Endianness::BigEndian => BigEndian::read_u32(bytes),
        })
    }

    /// Read an i32 in the cursor's byte order
    pub fn read_i32(&mut self) -> MetaResult<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read an f32 in the cursor's byte order
    pub fn read_f32(&mut self) -> MetaResult<f32> {
        let bytes = self.read_bytes(4)?;
        Ok(match self.endianness {
            Endianness::LittleEndian => LittleEndian::read_f32(bytes),
            Endianness::BigEndian => BigEndian::read_f32(bytes),
        })
    }

    /// Read an f64 in the cursor's byte order
    pub fn read_f64(&mut self) -> MetaResult<f64> {
        let bytes = self.read_bytes(8)?;
        Ok(match self.endianness {
            Endianness::LittleEndian => LittleEndian::read_f64(bytes),
            Endianness::BigEndian => BigEndian::read_f64(bytes),
        })
    }

    fn ensure(&self, count: usize) -> MetaResult<()> {
        if count > self.remaining() {
            return Err(MetaError::TruncatedData {
                offset: self.offset,
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(())
    }
}
