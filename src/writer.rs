//! Bytefield encoder.

use crate::bits::{BooleanByteMap, BITS_PER_BYTE};
use crate::error::{Error, Result};
use crate::text;
use crate::types::Value;

const INITIAL_CAPACITY: usize = 16;

/// Writer records an ordered list of typed writes and lays them out into a
/// single buffer on demand.
///
/// Values are not encoded until [`buffer`](Self::buffer) or
/// [`export`](Self::export) is called, so a writer can be spliced into
/// another with [`write_writer`](Self::write_writer) without re-encoding.
#[derive(Debug, Clone)]
pub struct Writer {
    data: Vec<Value>,
    total_length: usize,
}

impl Writer {
    /// Creates a new writer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates a new writer with room for `capacity` pending writes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            total_length: 0,
        }
    }

    /// Returns the encoded length in bytes.
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Returns the pending writes in order.
    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// Returns the number of pending writes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Resets the writer for reuse.
    pub fn reset(&mut self) {
        self.data.clear();
        self.total_length = 0;
    }

    /// Appends a typed value.
    pub fn write_value(&mut self, value: Value) -> &mut Self {
        self.total_length += value.width();
        self.data.push(value);
        self
    }

    /// Writes a character as its code point truncated to one byte.
    pub fn write_char(&mut self, value: char) -> &mut Self {
        self.write_uint8(u32::from(value) as u8)
    }

    /// Writes an 8-bit signed integer.
    pub fn write_int8(&mut self, value: i8) -> &mut Self {
        self.write_value(Value::Int8(value))
    }

    /// Writes a 16-bit signed integer (big-endian).
    pub fn write_int16(&mut self, value: i16) -> &mut Self {
        self.write_value(Value::Int16(value))
    }

    /// Writes a 32-bit signed integer (big-endian).
    pub fn write_int32(&mut self, value: i32) -> &mut Self {
        self.write_value(Value::Int32(value))
    }

    /// Writes an 8-bit unsigned integer.
    pub fn write_uint8(&mut self, value: u8) -> &mut Self {
        self.write_value(Value::Uint8(value))
    }

    /// Writes a 16-bit unsigned integer (big-endian).
    pub fn write_uint16(&mut self, value: u16) -> &mut Self {
        self.write_value(Value::Uint16(value))
    }

    /// Writes a 32-bit unsigned integer (big-endian).
    pub fn write_uint32(&mut self, value: u32) -> &mut Self {
        self.write_value(Value::Uint32(value))
    }

    /// Writes a 64-bit float (IEEE 754, big-endian).
    pub fn write_float64(&mut self, value: f64) -> &mut Self {
        self.write_value(Value::Float64(value))
    }

    /// Writes a 64-bit unsigned integer (big-endian).
    pub fn write_big_uint64(&mut self, value: u64) -> &mut Self {
        self.write_value(Value::BigUint64(value))
    }

    /// Embeds another writer's output behind an int32 length prefix.
    ///
    /// `None` writes a zero length and no payload.
    pub fn write_writer(&mut self, writer: Option<&Writer>) -> Result<&mut Self> {
        let Some(writer) = writer else {
            return Ok(self.write_int32(0));
        };
        let length = i32::try_from(writer.total_length)
            .map_err(|_| Error::LengthOverflow(writer.total_length))?;
        self.write_int32(length);
        self.data.extend_from_slice(&writer.data);
        self.total_length += writer.total_length;
        Ok(self)
    }

    /// Packs eight flags into one byte.
    pub fn write_booleans(&mut self, values: [bool; BITS_PER_BYTE]) -> &mut Self {
        self.write_boolean_map(&BooleanByteMap::from(values))
    }

    /// Writes the current value of a hand-filled map.
    pub fn write_boolean_map(&mut self, map: &BooleanByteMap) -> &mut Self {
        self.write_uint8(map.value())
    }

    /// Packs one flag per item, eight to a byte.
    ///
    /// A trailing partial group is padded with `false`, so `n` items always
    /// produce `ceil(n / 8)` bytes.
    pub fn write_booleans_array_func<I, F>(&mut self, items: I, mut predicate: F) -> &mut Self
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> bool,
    {
        let mut map = BooleanByteMap::new();
        for item in items {
            map.write_boolean(predicate(item));
            if map.len() == BITS_PER_BYTE {
                self.write_boolean_map(&map);
                map = BooleanByteMap::new();
            }
        }
        if !map.is_empty() {
            map.fill_zero();
            self.write_boolean_map(&map);
        }
        self
    }

    /// Lays out all pending writes into a new buffer.
    pub fn buffer(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; self.total_length];
        let mut offset = 0;
        for value in &self.data {
            let width = value.width();
            value.encode_into(&mut buffer[offset..offset + width]);
            offset += width;
        }
        buffer
    }

    /// Returns the buffer as base64 text.
    pub fn export(&self) -> String {
        text::encode(&self.buffer())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_integers() {
        let mut writer = Writer::new();
        writer.write_int8(-1).write_uint16(0x0102).write_int32(-2);
        assert_eq!(writer.total_length(), 7);
        assert_eq!(writer.buffer(), [0xff, 0x01, 0x02, 0xff, 0xff, 0xff, 0xfe]);
    }

    #[test]
    fn test_write_char() {
        let mut writer = Writer::new();
        writer.write_char('a').write_char('\u{e9}');
        assert_eq!(writer.buffer(), [b'a', 0xe9]);
    }

    #[test]
    fn test_write_booleans() {
        let mut writer = Writer::new();
        writer.write_booleans([true, false, false, true, true, false, true, true]);
        assert_eq!(writer.buffer(), [0x9b]);
    }

    #[test]
    fn test_write_booleans_array_func_pads_partial_group() {
        let data = [0, 1, 0, 1, 0, 1, 0, 1, 1, 0, 1, 0];
        let mut writer = Writer::new();
        writer.write_booleans_array_func(data, |v| v == 1);
        assert_eq!(writer.buffer(), [0b0101_0101, 0b1010_0000]);
    }

    #[test]
    fn test_write_booleans_array_func_empty() {
        let mut writer = Writer::new();
        writer.write_booleans_array_func(Vec::<bool>::new(), |v| v);
        assert!(writer.is_empty());
        assert_eq!(writer.total_length(), 0);
    }

    #[test]
    fn test_write_writer() {
        let mut inner = Writer::new();
        inner.write_int16(10000);

        let mut writer = Writer::new();
        writer.write_writer(Some(&inner)).unwrap();
        assert_eq!(writer.total_length(), 6);
        assert_eq!(writer.buffer(), [0, 0, 0, 2, 0x27, 0x10]);
    }

    #[test]
    fn test_write_absent_writer() {
        let mut writer = Writer::new();
        writer.write_writer(None).unwrap().write_int8(1);
        assert_eq!(writer.buffer(), [0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_buffer_is_repeatable() {
        let mut writer = Writer::new();
        writer.write_float64(1.0 / 3.0).write_big_uint64(u64::MAX);
        assert_eq!(writer.buffer(), writer.buffer());
        assert_eq!(writer.buffer().len(), 16);
    }

    #[test]
    fn test_reset() {
        let mut writer = Writer::new();
        writer.write_uint32(7);
        writer.reset();
        assert!(writer.is_empty());
        assert!(writer.buffer().is_empty());
    }
}
