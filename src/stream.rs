//! Streaming support for Bytefield buffers.
//!
//! Frames buffers over any type implementing [`std::io::Read`] or
//! [`std::io::Write`]. Each frame is laid out exactly like an embedded block:
//! a 4-byte big-endian signed length followed by the payload.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use bytefield::stream::{StreamReader, StreamWriter};
//! use bytefield::{Result, Writer};
//!
//! fn main() -> Result<()> {
//!     let mut buffer = Vec::new();
//!     {
//!         let mut stream = StreamWriter::new(&mut buffer);
//!
//!         let mut msg = Writer::new();
//!         msg.write_int32(42);
//!         stream.write_writer(&msg)?;
//!
//!         let mut msg = Writer::new();
//!         msg.write_char('x');
//!         stream.write_writer(&msg)?;
//!
//!         stream.flush()?;
//!     }
//!
//!     let mut stream = StreamReader::new(Cursor::new(&buffer));
//!     assert_eq!(stream.read_reader()?.read_int32()?, 42);
//!     assert_eq!(stream.read_reader()?.read_char()?, 'x');
//!     assert!(stream.try_read_frame()?.is_none());
//!     Ok(())
//! }
//! ```

use std::io::{self, BufReader, BufWriter, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::types::LENGTH_PREFIX_SIZE;
use crate::writer::Writer;

/// Default buffer capacity for stream readers/writers.
const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Maximum frame size allowed by default (64 MB).
const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

/// StreamWriter writes length-prefixed frames to a byte stream.
pub struct StreamWriter<W: Write> {
    inner: BufWriter<W>,
}

impl<W: Write> StreamWriter<W> {
    /// Creates a new StreamWriter wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY, writer)
    }

    /// Creates a new StreamWriter with the specified buffer capacity.
    pub fn with_capacity(capacity: usize, writer: W) -> Self {
        Self {
            inner: BufWriter::with_capacity(capacity, writer),
        }
    }

    /// Writes one frame.
    pub fn write_frame(&mut self, data: &[u8]) -> Result<()> {
        let length = i32::try_from(data.len()).map_err(|_| Error::LengthOverflow(data.len()))?;
        self.inner.write_i32::<BigEndian>(length)?;
        self.inner.write_all(data)?;
        Ok(())
    }

    /// Writes a writer's buffer as one frame.
    pub fn write_writer(&mut self, writer: &Writer) -> Result<()> {
        self.write_frame(&writer.buffer())
    }

    /// Flushes the underlying buffer.
    pub fn flush(&mut self) -> Result<()> {
        Ok(self.inner.flush()?)
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        self.inner.get_ref()
    }

    /// Returns a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        self.inner.get_mut()
    }

    /// Consumes this StreamWriter, returning the underlying writer.
    ///
    /// Buffered data is flushed first; an error is returned if that fails.
    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner().map_err(|e| Error::from(e.into_error()))
    }
}

/// StreamReader reads length-prefixed frames from a byte stream.
pub struct StreamReader<R: Read> {
    inner: BufReader<R>,
    max_frame_size: usize,
}

impl<R: Read> StreamReader<R> {
    /// Creates a new StreamReader wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY, reader)
    }

    /// Creates a new StreamReader with the specified buffer capacity.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, reader),
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    /// Sets the maximum allowed frame size.
    pub fn set_max_frame_size(&mut self, size: usize) {
        self.max_frame_size = size;
    }

    /// Returns the maximum allowed frame size.
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// Reads one frame.
    ///
    /// Fails with [`Error::UnexpectedEof`] if the stream ends first.
    pub fn read_frame(&mut self) -> Result<Vec<u8>> {
        self.try_read_frame()?.ok_or(Error::UnexpectedEof)
    }

    /// Reads one frame and wraps it in a [`Reader`].
    pub fn read_reader(&mut self) -> Result<Reader> {
        Ok(Reader::new(self.read_frame()?))
    }

    /// Reads one frame, returning None if the stream is at a frame boundary
    /// and has no more data.
    pub fn try_read_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let length = match self.try_read_length()? {
            Some(length) => length,
            None => return Ok(None),
        };
        if length > self.max_frame_size {
            return Err(Error::frame_too_large(length, self.max_frame_size));
        }

        let mut data = vec![0u8; length];
        self.inner.read_exact(&mut data).map_err(eof_or_io)?;
        Ok(Some(data))
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    /// Returns a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        self.inner.get_mut()
    }

    /// Reads a length prefix, returning None on a clean EOF.
    fn try_read_length(&mut self) -> Result<Option<usize>> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        let mut filled = 0;
        while filled < LENGTH_PREFIX_SIZE {
            match self.inner.read(&mut prefix[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(Error::UnexpectedEof),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::from(e)),
            }
        }

        let length = prefix.as_slice().read_i32::<BigEndian>()?;
        usize::try_from(length)
            .map(Some)
            .map_err(|_| Error::NegativeLength(length))
    }
}

fn eof_or_io(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::UnexpectedEof
    } else {
        Error::Io(err)
    }
}

/// Iterator over frames in a stream.
pub struct FrameIter<'a, R: Read> {
    reader: &'a mut StreamReader<R>,
}

impl<R: Read> StreamReader<R> {
    /// Returns an iterator over the remaining frames in the stream.
    pub fn frames(&mut self) -> FrameIter<'_, R> {
        FrameIter { reader: self }
    }
}

impl<R: Read> Iterator for FrameIter<'_, R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.try_read_frame().transpose()
    }
}
