//! Binary payload codec.
//!
//! Images travel inside JSON bodies as standard (padded) base64. This is the
//! only place raw bytes and their text form are converted.

use crate::error::ClientError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encode raw bytes for embedding in a JSON body.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a base64 field back into raw bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, ClientError> {
    Ok(STANDARD.decode(text)?)
}
