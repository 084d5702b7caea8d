//! Error types for Veil core operations.
//!
//! Low-level errors (codec, digest, key derivation, cipher) are descriptive.
//! The container layer collapses every failure on the unlock path into
//! [`VeilError::UnlockFailed`] before it reaches a caller, so a caller can
//! never tell a wrong passphrase apart from a damaged salt, nonce or
//! ciphertext.

use thiserror::Error;

/// Result type alias for Veil operations.
pub type Result<T> = std::result::Result<T, VeilError>;

/// Message shown for every failed unlock attempt.
pub const UNLOCK_FAILED_MESSAGE: &str = "Invalid key or corrupted package";

/// Core error type for Veil operations.
#[derive(Debug, Error)]
pub enum VeilError {
    /// A required input (base or hidden image) was absent or empty
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Passphrase is empty or does not meet the configured policy
    #[error("Weak or missing key: {0}")]
    WeakOrMissingKey(String),

    /// Invalid base64, hex or data-URL text
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Serialized package is missing fields, has wrong types or an unknown version
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// Key, nonce or salt length does not match what the cipher requires
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Key derivation inputs were malformed
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// The authentication tag did not verify
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Generic unlock failure surfaced to callers
    #[error("{}", UNLOCK_FAILED_MESSAGE)]
    UnlockFailed,

    /// Stored checksum does not match the stored ciphertext
    #[error("Integrity mismatch: expected checksum {expected}, computed {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    /// The random source could not produce bytes
    #[error("Random source error: {0}")]
    Random(String),

    /// Package file not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl VeilError {
    /// True for the errors a user can fix by supplying a different passphrase.
    pub fn is_unlock_failure(&self) -> bool {
        matches!(self, VeilError::UnlockFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_failed_message_is_generic() {
        let message = VeilError::UnlockFailed.to_string();
        assert_eq!(message, UNLOCK_FAILED_MESSAGE);
        assert!(!message.to_lowercase().contains("salt"));
        assert!(!message.to_lowercase().contains("nonce"));
    }

    #[test]
    fn test_integrity_mismatch_names_both_checksums() {
        let err = VeilError::IntegrityMismatch {
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("aa"));
        assert!(message.contains("bb"));
    }

    #[test]
    fn test_is_unlock_failure() {
        assert!(VeilError::UnlockFailed.is_unlock_failure());
        assert!(!VeilError::AuthenticationFailed.is_unlock_failure());
    }
}
