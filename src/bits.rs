//! Packing of boolean flags into a single byte.

use std::fmt;

/// Number of flags that fit in one packed byte.
pub const BITS_PER_BYTE: usize = 8;

/// BooleanByteMap packs up to eight boolean flags into one byte.
///
/// Writing shifts the accumulator left and places the new flag in the low
/// bit, so the first flag written ends up in the highest position. Reading
/// takes the low bit and shifts right. A byte decoded from the wire must be
/// passed through [`reverse`](Self::reverse) once before reading so that the
/// first read yields the first flag that was written; [`Reader::read_boolean_map`]
/// does this for you.
///
/// [`Reader::read_boolean_map`]: crate::Reader::read_boolean_map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanByteMap {
    value: u8,
    len: usize,
}

impl BooleanByteMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map holding a byte decoded from the wire.
    ///
    /// The bit count starts at zero; call [`reverse`](Self::reverse) before
    /// reading flags in write order.
    pub fn from_value(value: u8) -> Self {
        Self { value, len: 0 }
    }

    /// Appends one flag. Flags written beyond the eighth push the oldest out.
    pub fn write_boolean(&mut self, value: bool) -> &mut Self {
        self.value = (self.value << 1) | u8::from(value);
        self.len += 1;
        self
    }

    /// Appends exactly eight flags in order.
    pub fn write_all(&mut self, values: [bool; BITS_PER_BYTE]) -> &mut Self {
        for value in values {
            self.write_boolean(value);
        }
        self
    }

    /// Pads with `false` until eight flags have been written.
    pub fn fill_zero(&mut self) -> &mut Self {
        for _ in 0..BITS_PER_BYTE.saturating_sub(self.len) {
            self.write_boolean(false);
        }
        self
    }

    /// Takes the low bit and shifts the accumulator right.
    pub fn read_boolean(&mut self) -> bool {
        let value = self.value & 1 != 0;
        self.value >>= 1;
        value
    }

    /// Reverses the bit order of the accumulator.
    pub fn reverse(&mut self) -> &mut Self {
        let mut bits = [false; BITS_PER_BYTE];
        for bit in bits.iter_mut() {
            *bit = self.read_boolean();
        }
        for bit in bits {
            self.write_boolean(bit);
        }
        self
    }

    /// Returns the packed byte.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns the number of flags written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no flags have been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl From<u8> for BooleanByteMap {
    fn from(value: u8) -> Self {
        Self::from_value(value)
    }
}

impl From<[bool; BITS_PER_BYTE]> for BooleanByteMap {
    fn from(values: [bool; BITS_PER_BYTE]) -> Self {
        let mut map = Self::new();
        map.write_all(values);
        map
    }
}

impl fmt::Display for BooleanByteMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
