//! Base64 transport form of encoded buffers.
//!
//! Uses the standard RFC 4648 alphabet with `=` padding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Result;

/// Encodes bytes as padded standard base64.
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes padded standard base64 text.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(text)?)
}
