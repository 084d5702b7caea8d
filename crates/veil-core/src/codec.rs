//! Text encodings used by the package format.
//!
//! Binary fields travel as standard base64 with canonical padding, the
//! checksum as lowercase hex, and the base image either as a `data:` URL
//! or as bare base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Result, VeilError};

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Encode bytes as standard, padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64.
///
/// # Errors
///
/// Returns `VeilError::MalformedEncoding` on characters outside the
/// alphabet or non-canonical padding.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| VeilError::MalformedEncoding(format!("invalid base64: {}", e)))
}

/// Format bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Parse hex text (either case) into bytes.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| VeilError::MalformedEncoding(format!("invalid hex: {}", e)))
}

/// Encode image bytes for the `baseImage` field.
///
/// With a media type the result is a `data:<type>;base64,<payload>` URL,
/// otherwise bare base64.
pub fn encode_image(media_type: Option<&str>, bytes: &[u8]) -> String {
    match media_type {
        Some(media_type) => format!(
            "{}{}{},{}",
            DATA_URL_PREFIX,
            media_type,
            BASE64_MARKER,
            encode_base64(bytes)
        ),
        None => encode_base64(bytes),
    }
}

/// Decode a `baseImage` field into its media type (if any) and bytes.
///
/// # Errors
///
/// Returns `VeilError::MalformedEncoding` for a `data:` URL without a
/// payload separator or without the `;base64` marker, or for bad base64.
pub fn decode_image(text: &str) -> Result<(Option<String>, Vec<u8>)> {
    let Some(rest) = text.strip_prefix(DATA_URL_PREFIX) else {
        return Ok((None, decode_base64(text)?));
    };

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| VeilError::MalformedEncoding("data URL has no payload".to_string()))?;
    let media_type = header.strip_suffix(BASE64_MARKER).ok_or_else(|| {
        VeilError::MalformedEncoding("data URL is not base64 encoded".to_string())
    })?;

    let media_type = if media_type.is_empty() {
        None
    } else {
        Some(media_type.to_string())
    };
    Ok((media_type, decode_base64(payload)?))
}
