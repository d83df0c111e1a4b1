//! Error types for Bytefield operations.

use thiserror::Error;

/// Result type for Bytefield operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Bytefield operations.
///
/// The wire format carries no tags, so a reader issuing reads in a different
/// order or of different kinds than the writer gets wrong values rather than
/// an error. Only structural problems are reported.
#[derive(Error, Debug)]
pub enum Error {
    /// A read would consume bytes past the end of the buffer.
    #[error("read out of range: needed {needed} bytes, only {available} available")]
    OutOfRange { needed: usize, available: usize },

    /// Base64 text could not be decoded.
    #[error("malformed base64 input: {0}")]
    MalformedInput(#[from] base64::DecodeError),

    /// A length prefix decoded to a negative value.
    #[error("negative length prefix: {0}")]
    NegativeLength(i32),

    /// A nested buffer is too long for an int32 length prefix.
    #[error("length {0} does not fit in an int32 prefix")]
    LengthOverflow(usize),

    /// A stream frame exceeds the configured maximum.
    #[error("frame size {size} exceeds maximum {max}")]
    FrameTooLarge { size: usize, max: usize },

    /// Unexpected end of stream in the middle of a frame.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an out of range error.
    pub fn out_of_range(needed: usize, available: usize) -> Self {
        Self::OutOfRange { needed, available }
    }

    /// Creates a frame too large error.
    pub fn frame_too_large(size: usize, max: usize) -> Self {
        Self::FrameTooLarge { size, max }
    }
}
