//! SHA-256 checksums for package integrity.
//!
//! The checksum is for integrity display and transit verification only.
//! Authentication of the hidden payload is the cipher tag's job.

use sha2::{Digest, Sha256};

use crate::codec::to_hex;

/// Length of a hex-encoded SHA-256 digest.
pub const CHECKSUM_HEX_LEN: usize = 64;

/// Raw SHA-256 digest of the provided bytes.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Lowercase hex SHA-256 digest (64 characters).
pub fn sha256_hex(data: &[u8]) -> String {
    to_hex(&sha256(data))
}

/// Recompute the checksum of `data` and compare it with `expected_hex`.
pub fn checksum_matches(data: &[u8], expected_hex: &str) -> bool {
    sha256_hex(data).eq_ignore_ascii_case(expected_hex)
}

/// True if `text` has the shape of a hex SHA-256 digest.
pub fn is_checksum_hex(text: &str) -> bool {
    text.len() == CHECKSUM_HEX_LEN && text.bytes().all(|b| b.is_ascii_hexdigit())
}
