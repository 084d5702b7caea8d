//! AES-256-GCM authenticated encryption for the hidden image.
//!
//! No associated data is used. The output of `encrypt` is the ciphertext
//! with the 16-byte authentication tag appended.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::error::{Result, VeilError};

/// AES-256 key length in bytes.
pub const KEY_SIZE: usize = 32;

/// GCM nonce length in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Authenticated cipher capability injected into the container engine.
pub trait CipherProvider: Send + Sync {
    /// Key length in bytes this cipher requires.
    fn key_len(&self) -> usize;

    /// Nonce length in bytes this cipher requires.
    fn nonce_len(&self) -> usize;

    /// Encrypt `plaintext`, returning ciphertext with the tag appended.
    ///
    /// # Errors
    ///
    /// Returns `VeilError::InvalidParameters` if the key or nonce length is wrong.
    fn encrypt(&self, key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Verify and decrypt `ciphertext` (ciphertext || tag).
    ///
    /// # Errors
    ///
    /// Returns `VeilError::InvalidParameters` if the key or nonce length is
    /// wrong, and `VeilError::AuthenticationFailed` for any other failure.
    fn decrypt(&self, key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// AES-256-GCM cipher.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmCipher;

impl AesGcmCipher {
    fn cipher(key: &[u8]) -> Result<Aes256Gcm> {
        if key.len() != KEY_SIZE {
            return Err(VeilError::InvalidParameters(format!(
                "Key must be {} bytes (got {})",
                KEY_SIZE,
                key.len()
            )));
        }
        Aes256Gcm::new_from_slice(key)
            .map_err(|e| VeilError::InvalidParameters(format!("Invalid AES key: {}", e)))
    }

    fn check_nonce(nonce: &[u8]) -> Result<()> {
        if nonce.len() != NONCE_SIZE {
            return Err(VeilError::InvalidParameters(format!(
                "Nonce must be {} bytes (got {})",
                NONCE_SIZE,
                nonce.len()
            )));
        }
        Ok(())
    }
}

impl CipherProvider for AesGcmCipher {
    fn key_len(&self) -> usize {
        KEY_SIZE
    }

    fn nonce_len(&self) -> usize {
        NONCE_SIZE
    }

    fn encrypt(&self, key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Self::cipher(key)?;
        Self::check_nonce(nonce)?;

        cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|_| VeilError::InvalidParameters("Plaintext too large".to_string()))
    }

    fn decrypt(&self, key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Self::cipher(key)?;
        Self::check_nonce(nonce)?;

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| VeilError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_SIZE] = [42u8; KEY_SIZE];
    const NONCE: [u8; NONCE_SIZE] = [7u8; NONCE_SIZE];

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let plaintext = b"hidden layer bytes";

        let ciphertext = AesGcmCipher.encrypt(&KEY, &NONCE, plaintext).unwrap();
        let decrypted = AesGcmCipher.decrypt(&KEY, &NONCE, &ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_tag_is_appended() {
        let plaintext = b"hidden";
        let ciphertext = AesGcmCipher.encrypt(&KEY, &NONCE, plaintext).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len() + TAG_SIZE);
    }

    #[test]
    fn test_empty_plaintext() {
        let ciphertext = AesGcmCipher.encrypt(&KEY, &NONCE, b"").unwrap();
        assert_eq!(ciphertext.len(), TAG_SIZE);
        assert!(AesGcmCipher
            .decrypt(&KEY, &NONCE, &ciphertext)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_wrong_key_fails() {
        let ciphertext = AesGcmCipher.encrypt(&KEY, &NONCE, b"secret").unwrap();
        let result = AesGcmCipher.decrypt(&[1u8; KEY_SIZE], &NONCE, &ciphertext);
        assert!(matches!(result, Err(VeilError::AuthenticationFailed)));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let ciphertext = AesGcmCipher.encrypt(&KEY, &NONCE, b"secret").unwrap();
        let result = AesGcmCipher.decrypt(&KEY, &[0u8; NONCE_SIZE], &ciphertext);
        assert!(matches!(result, Err(VeilError::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut ciphertext = AesGcmCipher.encrypt(&KEY, &NONCE, b"secret").unwrap();
        ciphertext[0] ^= 0x01;

        let result = AesGcmCipher.decrypt(&KEY, &NONCE, &ciphertext);
        assert!(matches!(result, Err(VeilError::AuthenticationFailed)));
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let result = AesGcmCipher.decrypt(&KEY, &NONCE, &[0u8; TAG_SIZE - 1]);
        assert!(matches!(result, Err(VeilError::AuthenticationFailed)));
    }

    #[test]
    fn test_bad_key_length_rejected() {
        let result = AesGcmCipher.encrypt(&[0u8; 16], &NONCE, b"secret");
        assert!(matches!(result, Err(VeilError::InvalidParameters(_))));
        let result = AesGcmCipher.decrypt(&[0u8; 31], &NONCE, b"secret");
        assert!(matches!(result, Err(VeilError::InvalidParameters(_))));
    }

    #[test]
    fn test_bad_nonce_length_rejected() {
        let result = AesGcmCipher.encrypt(&KEY, &[0u8; 16], b"secret");
        assert!(matches!(result, Err(VeilError::InvalidParameters(_))));
    }

    #[test]
    fn test_ciphertext_differs_from_plaintext() {
        let plaintext = b"PLAINTEXT_MARKER_123";
        let ciphertext = AesGcmCipher.encrypt(&KEY, &NONCE, plaintext).unwrap();
        assert!(!ciphertext
            .windows(plaintext.len())
            .any(|window| window == plaintext));
    }
}
