//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! The default iteration count costs hundreds of milliseconds per
//! derivation in an optimized build.

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, VeilError};

/// Iterations used by format `0.1-json`.
pub const DEFAULT_ITERATIONS: u32 = 200_000;

/// Key length used by format `0.1-json` (AES-256).
pub const DEFAULT_KEY_BITS: u32 = 256;

/// Parameters for passphrase stretching.
///
/// The package format does not record these, so a package can only be
/// revealed with the parameters it was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
    pub key_bits: u32,
}

impl KdfParams {
    pub const fn new(iterations: u32, key_bits: u32) -> Self {
        Self {
            iterations,
            key_bits,
        }
    }

    /// Output length in bytes.
    pub fn key_len(&self) -> usize {
        (self.key_bits / 8) as usize
    }

    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(VeilError::KeyDerivation(
                "Iteration count must be positive".to_string(),
            ));
        }
        if self.key_bits == 0 || self.key_bits % 8 != 0 {
            return Err(VeilError::KeyDerivation(format!(
                "Key length must be a positive multiple of 8 bits (got {})",
                self.key_bits
            )));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS, DEFAULT_KEY_BITS)
    }
}

/// A symmetric key derived from a passphrase.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: Vec<u8>,
}

impl DerivedKey {
    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a key from a passphrase with PBKDF2-HMAC-SHA256.
///
/// # Arguments
///
/// * `passphrase` - Any string, including empty; policy is enforced by callers
/// * `salt` - Random salt stored alongside the ciphertext
/// * `params` - Iteration count and output length
///
/// # Errors
///
/// Returns `VeilError::KeyDerivation` for an empty salt, a zero iteration
/// count, or a key length that is zero or not a whole number of bytes.
///
/// # Examples
///
/// ```
/// use veil_core::crypto::{derive_key, KdfParams};
///
/// let params = KdfParams::new(1_000, 256);
/// let key = derive_key("unseen-walk", &[0u8; 16], &params).unwrap();
/// assert_eq!(key.len(), 32);
/// ```
pub fn derive_key(passphrase: &str, salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if salt.is_empty() {
        return Err(VeilError::KeyDerivation("Salt cannot be empty".to_string()));
    }
    params.validate()?;

    let mut key = vec![0u8; params.key_len()];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, params.iterations, &mut key);

    Ok(DerivedKey { key })
}

/// Derive a key on tokio's blocking pool.
///
/// Dropping the returned future stops waiting for the result; the
/// derivation itself runs to completion on its own buffers.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub async fn derive_key_async(
    passphrase: SecretString,
    salt: Vec<u8>,
    params: KdfParams,
) -> Result<DerivedKey> {
    tokio::task::spawn_blocking(move || derive_key(passphrase.expose_secret(), &salt, &params))
        .await
        .map_err(|e| VeilError::KeyDerivation(format!("Derivation task failed: {}", e)))?
}
