//! Wire format types and utilities.

use byteorder::{BigEndian, ByteOrder};

/// Width in bytes of the length prefix in front of an embedded block.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// A single pending write: a typed value whose variant fixes its width.
///
/// All multi-byte values are laid out big-endian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// 8-bit signed integer.
    Int8(i8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 8-bit unsigned integer. Characters and packed flags use this too.
    Uint8(u8),
    /// 16-bit unsigned integer.
    Uint16(u16),
    /// 32-bit unsigned integer.
    Uint32(u32),
    /// 64-bit float (IEEE 754).
    Float64(f64),
    /// 64-bit unsigned integer.
    BigUint64(u64),
}

impl Value {
    /// Returns the encoded width in bytes.
    #[inline]
    pub fn width(&self) -> usize {
        match self {
            Value::Int8(_) | Value::Uint8(_) => 1,
            Value::Int16(_) | Value::Uint16(_) => 2,
            Value::Int32(_) | Value::Uint32(_) => 4,
            Value::Float64(_) | Value::BigUint64(_) => 8,
        }
    }

    /// Encodes the value into the front of `buf`.
    ///
    /// `buf` must be at least [`width`](Self::width) bytes long.
    pub(crate) fn encode_into(&self, buf: &mut [u8]) {
        match *self {
            Value::Int8(v) => buf[0] = v as u8,
            Value::Uint8(v) => buf[0] = v,
            Value::Int16(v) => BigEndian::write_i16(buf, v),
            Value::Uint16(v) => BigEndian::write_u16(buf, v),
            Value::Int32(v) => BigEndian::write_i32(buf, v),
            Value::Uint32(v) => BigEndian::write_u32(buf, v),
            Value::Float64(v) => BigEndian::write_f64(buf, v),
            Value::BigUint64(v) => BigEndian::write_u64(buf, v),
        }
    }
}

/// Number of packed bytes needed for `flags` boolean flags.
#[inline]
pub fn packed_len(flags: usize) -> usize {
    flags.div_ceil(crate::bits::BITS_PER_BYTE)
}
