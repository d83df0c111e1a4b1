//! Bytefield decoder.

use byteorder::{BigEndian, ByteOrder};

use crate::bits::{BooleanByteMap, BITS_PER_BYTE};
use crate::error::{Error, Result};
use crate::text;
use crate::types::packed_len;

/// Reader decodes values from an owned buffer in the order they were written.
///
/// Every read advances the cursor by the primitive's width. A read that would
/// run past the end fails with [`Error::OutOfRange`] and leaves the cursor
/// where it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reader {
    buffer: Vec<u8>,
    pos: usize,
}

impl Reader {
    /// Creates a new reader over `data`.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: data.into(),
            pos: 0,
        }
    }

    /// Decodes base64 text and wraps the result.
    pub fn import(text: &str) -> Result<Self> {
        Ok(Self::new(text::decode(text)?))
    }

    /// Returns the whole underlying buffer, read or not.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the reader and returns its buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Returns the current cursor position.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Returns the total buffer length.
    pub fn byte_length(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.pos
    }

    /// Returns true if the cursor has not reached the end.
    pub fn has_unread_bytes(&self) -> bool {
        self.pos < self.buffer.len()
    }

    fn check_available(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::out_of_range(needed, self.remaining()));
        }
        Ok(())
    }

    fn read_bytes(&mut self, length: usize) -> Result<&[u8]> {
        self.check_available(length)?;
        let start = self.pos;
        self.pos += length;
        Ok(&self.buffer[start..self.pos])
    }

    /// Reads an 8-bit signed integer.
    pub fn read_int8(&mut self) -> Result<i8> {
        Ok(self.read_uint8()? as i8)
    }

    /// Reads a 16-bit signed integer (big-endian).
    pub fn read_int16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.read_bytes(2)?))
    }

    /// Reads a 32-bit signed integer (big-endian).
    pub fn read_int32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.read_bytes(4)?))
    }

    /// Reads an 8-bit unsigned integer.
    pub fn read_uint8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a 16-bit unsigned integer (big-endian).
    pub fn read_uint16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    /// Reads a 32-bit unsigned integer (big-endian).
    pub fn read_uint32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    /// Reads a 64-bit float (IEEE 754, big-endian).
    pub fn read_float64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.read_bytes(8)?))
    }

    /// Reads a 64-bit unsigned integer (big-endian).
    pub fn read_big_uint64(&mut self) -> Result<u64> {
        Ok(BigEndian::read_u64(self.read_bytes(8)?))
    }

    /// Reads a one-byte character.
    ///
    /// The byte is taken as signed and widened to a 16-bit code unit, so
    /// 0x00..=0x7F decode as ASCII and 0x80..=0xFF decode as U+FF80..=U+FFFF.
    pub fn read_char(&mut self) -> Result<char> {
        let code = u32::from(self.read_int8()? as u16);
        // U+FF80..=U+FFFF holds no surrogates, so the fallback never fires.
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    /// Reads one packed byte and returns a map that yields its flags in
    /// write order.
    pub fn read_boolean_map(&mut self) -> Result<BooleanByteMap> {
        let mut map = BooleanByteMap::from_value(self.read_uint8()?);
        map.reverse();
        Ok(map)
    }

    /// Reads eight flags packed into one byte.
    pub fn read_booleans(&mut self) -> Result<[bool; BITS_PER_BYTE]> {
        let mut map = self.read_boolean_map()?;
        let mut values = [false; BITS_PER_BYTE];
        for value in values.iter_mut() {
            *value = map.read_boolean();
        }
        Ok(values)
    }

    /// Reads `length` packed flags, calling `callback(index, flag)` for each.
    ///
    /// Consumes `ceil(length / 8)` bytes; padding bits in the last byte are
    /// skipped. Nothing is read and no callback runs if the buffer is short.
    pub fn read_boolean_array_func<F>(&mut self, length: usize, mut callback: F) -> Result<()>
    where
        F: FnMut(usize, bool),
    {
        self.check_available(packed_len(length))?;
        let mut map = BooleanByteMap::new();
        for i in 0..length {
            if i % BITS_PER_BYTE == 0 {
                map = self.read_boolean_map()?;
            }
            callback(i, map.read_boolean());
        }
        Ok(())
    }

    /// Reads `length` packed flags into a vector.
    pub fn read_booleans_vec(&mut self, length: usize) -> Result<Vec<bool>> {
        let mut values = Vec::with_capacity(length);
        self.read_boolean_array_func(length, |_, value| values.push(value))?;
        Ok(values)
    }

    /// Reads an embedded block into an independent reader.
    pub fn read_reader(&mut self) -> Result<Reader> {
        let start = self.pos;
        let length = self.read_int32()?;
        let length = match usize::try_from(length) {
            Ok(length) => length,
            Err(_) => {
                self.pos = start;
                return Err(Error::NegativeLength(length));
            }
        };
        if let Err(err) = self.check_available(length) {
            self.pos = start;
            return Err(err);
        }
        Ok(Reader::new(self.read_bytes(length)?.to_vec()))
    }
}

impl From<Vec<u8>> for Reader {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for Reader {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Writer;

    #[test]
    fn test_read_integers() {
        let mut reader = Reader::new(vec![0xff, 0x01, 0x02, 0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(reader.read_int8().unwrap(), -1);
        assert_eq!(reader.read_uint16().unwrap(), 0x0102);
        assert_eq!(reader.read_int32().unwrap(), -2);
        assert!(!reader.has_unread_bytes());
    }

    #[test]
    fn test_reinterpretation() {
        let mut reader = Reader::new(vec![0xff, 0xff]);
        assert_eq!(reader.read_uint8().unwrap(), 255);
        assert_eq!(reader.read_int8().unwrap(), -1);
    }

    #[test]
    fn test_read_char() {
        let mut reader = Reader::new(vec![b'a', 0x7f, 0x80, 0xe9, 0xff]);
        assert_eq!(reader.read_char().unwrap(), 'a');
        assert_eq!(reader.read_char().unwrap(), '\u{7f}');
        assert_eq!(reader.read_char().unwrap(), '\u{ff80}');
        assert_eq!(reader.read_char().unwrap(), '\u{ffe9}');
        assert_eq!(reader.read_char().unwrap(), '\u{ffff}');
    }

    #[test]
    fn test_write_char_high_byte_reads_sign_extended() {
        let mut writer = Writer::new();
        writer.write_char('\u{e9}').write_char('b');
        let mut reader = Reader::new(writer.buffer());
        assert_eq!(reader.read_char().unwrap(), '\u{ffe9}');
        assert_eq!(reader.read_char().unwrap(), 'b');
    }

    #[test]
    fn test_out_of_range_keeps_cursor() {
        let mut reader = Reader::new(vec![1, 2, 3]);
        assert_eq!(reader.read_uint8().unwrap(), 1);
        let err = reader.read_int32().unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                needed: 4,
                available: 2
            }
        ));
        assert_eq!(reader.offset(), 1);
        assert_eq!(reader.read_uint16().unwrap(), 0x0203);
        assert!(reader.read_uint8().is_err());
    }

    #[test]
    fn test_read_booleans() {
        let mut reader = Reader::new(vec![0x9b]);
        assert_eq!(
            reader.read_booleans().unwrap(),
            [true, false, false, true, true, false, true, true]
        );
    }

    #[test]
    fn test_read_boolean_map_partial_drain() {
        let mut reader = Reader::new(vec![0b1010_0000, 7]);
        let mut map = reader.read_boolean_map().unwrap();
        assert!(map.read_boolean());
        assert!(!map.read_boolean());
        assert!(map.read_boolean());
        assert_eq!(reader.read_uint8().unwrap(), 7);
    }

    #[test]
    fn test_read_boolean_array_func() {
        let mut reader = Reader::new(vec![0b0101_0101, 0b1010_0000]);
        let mut seen = Vec::new();
        reader
            .read_boolean_array_func(12, |i, v| seen.push((i, v)))
            .unwrap();
        let flags: Vec<bool> = seen.iter().map(|&(_, v)| v).collect();
        assert_eq!(
            flags,
            [false, true, false, true, false, true, false, true, true, false, true, false]
        );
        assert_eq!(seen.last().unwrap().0, 11);
        assert!(!reader.has_unread_bytes());
    }

    #[test]
    fn test_read_boolean_array_func_short_buffer() {
        let mut reader = Reader::new(vec![0xff]);
        let mut calls = 0;
        let result = reader.read_boolean_array_func(9, |_, _| calls += 1);
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
        assert_eq!(calls, 0);
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn test_read_reader() {
        let mut reader = Reader::new(vec![0, 0, 0, 3, 0x08, 0x07, 0x4d, 9]);
        let mut sub = reader.read_reader().unwrap();
        assert_eq!(sub.offset(), 0);
        assert_eq!(sub.byte_length(), 3);
        assert_eq!(sub.read_int16().unwrap(), 2055);
        assert_eq!(sub.read_uint8().unwrap(), 77);
        assert!(!sub.has_unread_bytes());
        assert_eq!(reader.read_uint8().unwrap(), 9);
    }

    #[test]
    fn test_read_reader_empty() {
        let mut reader = Reader::new(vec![0, 0, 0, 0]);
        let sub = reader.read_reader().unwrap();
        assert_eq!(sub.byte_length(), 0);
        assert!(!sub.has_unread_bytes());
    }

    #[test]
    fn test_read_reader_errors() {
        let mut reader = Reader::new(vec![0xff, 0xff, 0xff, 0xff]);
        assert!(matches!(
            reader.read_reader(),
            Err(Error::NegativeLength(-1))
        ));
        assert_eq!(reader.offset(), 0);

        let mut reader = Reader::new(vec![0, 0, 0, 5, 1]);
        assert!(matches!(reader.read_reader(), Err(Error::OutOfRange { .. })));
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn test_import() {
        let mut reader = Reader::import("CpsAAAACJxA=").unwrap();
        assert_eq!(reader.byte_length(), 8);
        assert_eq!(reader.read_int8().unwrap(), 10);
        assert!(matches!(Reader::import("%%%"), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_read_write_roundtrip() {
        let mut writer = Writer::new();
        writer
            .write_int8(-100)
            .write_uint32(u32::MAX)
            .write_float64(1.12345e250)
            .write_big_uint64(u64::MAX)
            .write_char('z');

        let mut reader = Reader::new(writer.buffer());
        assert_eq!(reader.read_int8().unwrap(), -100);
        assert_eq!(reader.read_uint32().unwrap(), u32::MAX);
        assert_eq!(reader.read_float64().unwrap(), 1.12345e250);
        assert_eq!(reader.read_big_uint64().unwrap(), u64::MAX);
        assert_eq!(reader.read_char().unwrap(), 'z');
        assert_eq!(reader.offset(), reader.byte_length());
    }
}
