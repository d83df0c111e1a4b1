//! Bytefield - compact positional binary serialization for Rust
//!
//! Values are written in call order with no tags or schema, so the reader
//! must issue the same reads, in the same order, as the writer. Integers and
//! floats are fixed-width big-endian, eight boolean flags pack into one byte,
//! and whole writers can be nested as length-prefixed blocks. Buffers travel
//! as raw bytes or as base64 text.
//!
//! # Example
//!
//! ```rust
//! use bytefield::{Reader, Result, Writer};
//!
//! fn main() -> Result<()> {
//!     // Encoding
//!     let mut inner = Writer::new();
//!     inner.write_int16(10000);
//!
//!     let mut writer = Writer::new();
//!     writer
//!         .write_int8(10)
//!         .write_booleans([true, false, false, true, true, false, true, true])
//!         .write_writer(Some(&inner))?;
//!     let text = writer.export();
//!     assert_eq!(text, "CpsAAAACJxA=");
//!
//!     // Decoding
//!     let mut reader = Reader::import(&text)?;
//!     assert_eq!(reader.read_int8()?, 10);
//!     assert_eq!(
//!         reader.read_booleans()?,
//!         [true, false, false, true, true, false, true, true]
//!     );
//!     let mut nested = reader.read_reader()?;
//!     assert_eq!(nested.read_int16()?, 10000);
//!     assert!(!reader.has_unread_bytes());
//!     Ok(())
//! }
//! ```

mod bits;
mod error;
mod reader;
pub mod stream;
pub mod text;
mod types;
mod writer;

pub use bits::{BooleanByteMap, BITS_PER_BYTE};
pub use error::{Error, Result};
pub use reader::Reader;
pub use stream::{StreamReader, StreamWriter};
pub use types::{packed_len, Value, LENGTH_PREFIX_SIZE};
pub use writer::Writer;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Marshal encodes a value using a custom encoder function.
pub fn marshal<T, F>(value: &T, encoder: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Writer, &T) -> Result<()>,
{
    let mut writer = Writer::new();
    encoder(&mut writer, value)?;
    Ok(writer.buffer())
}

/// Unmarshal decodes a value using a custom decoder function.
pub fn unmarshal<T, F>(data: &[u8], decoder: F) -> Result<T>
where
    F: FnOnce(&mut Reader) -> Result<T>,
{
    let mut reader = Reader::new(data);
    decoder(&mut reader)
}

/// Encodes a value to base64 text using a custom encoder function.
pub fn export<T, F>(value: &T, encoder: F) -> Result<String>
where
    F: FnOnce(&mut Writer, &T) -> Result<()>,
{
    Ok(text::encode(&marshal(value, encoder)?))
}

/// Decodes a value from base64 text using a custom decoder function.
pub fn import<T, F>(text: &str, decoder: F) -> Result<T>
where
    F: FnOnce(&mut Reader) -> Result<T>,
{
    let mut reader = Reader::import(text)?;
    decoder(&mut reader)
}
