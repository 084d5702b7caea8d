//! Build and reveal flows.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::{
    derive_key, derive_key_async, validate_passphrase, AesGcmCipher, CipherProvider, DerivedKey,
    KdfParams,
};
use crate::digest::sha256_hex;
use crate::error::{Result, VeilError};
use crate::random::{OsRandom, RandomSource};

use super::format::FORMAT_VERSION;
use super::package::{VeilMeta, VeilPackage};
use super::request::PackageRequest;
use super::SALT_SIZE;

/// Decrypted hidden image. Zeroized when dropped.
pub struct RevealedImage {
    bytes: Zeroizing<Vec<u8>>,
}

impl RevealedImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hand the plaintext to the caller, still zeroized on drop.
    pub fn into_bytes(self) -> Zeroizing<Vec<u8>> {
        self.bytes
    }
}

impl std::fmt::Debug for RevealedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealedImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Outcome of the checksum comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityStatus {
    Verified,
    Mismatch { expected: String, actual: String },
    /// The comparison itself failed; `unlock` holds the cause.
    Unchecked,
}

/// Integrity and unlock results for one reveal attempt, side by side.
#[derive(Debug)]
pub struct RevealReport {
    pub integrity: IntegrityStatus,
    pub unlock: Result<RevealedImage>,
}

impl RevealReport {
    /// Collapse the report into a single result.
    ///
    /// An integrity mismatch wins over the unlock outcome, so an altered
    /// package is always reported as altered.
    pub fn into_result(self) -> Result<RevealedImage> {
        match self.integrity {
            IntegrityStatus::Mismatch { expected, actual } => {
                Err(VeilError::IntegrityMismatch { expected, actual })
            }
            IntegrityStatus::Verified | IntegrityStatus::Unchecked => self.unlock,
        }
    }
}

/// Runs the build and reveal flows.
///
/// Cipher and randomness are injected so tests can pin salts and nonces.
/// The KDF parameters are not recorded in packages; a package can only be
/// revealed by an engine using the parameters it was built with.
///
/// # Examples
///
/// ```
/// use secrecy::SecretString;
/// use veil_core::container::{PackageRequest, VeilEngine};
/// use veil_core::crypto::{AesGcmCipher, KdfParams};
/// use veil_core::random::OsRandom;
///
/// let engine = VeilEngine::with_parts(AesGcmCipher, OsRandom)
///     .with_kdf_params(KdfParams::new(1_000, 256));
/// let passphrase = SecretString::from("unseen-walk");
///
/// let request = PackageRequest::new()
///     .base_image(vec![1, 2, 3])
///     .hidden_image(vec![4, 5, 6]);
/// let package = engine.build(&request, &passphrase).unwrap();
///
/// let revealed = engine.reveal(&package, &passphrase).unwrap();
/// assert_eq!(revealed.as_bytes(), &[4, 5, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct VeilEngine<C = AesGcmCipher, R = OsRandom> {
    cipher: C,
    random: R,
    kdf: KdfParams,
}

impl VeilEngine {
    /// AES-256-GCM, OS randomness, default KDF parameters.
    pub fn new() -> Self {
        Self::with_parts(AesGcmCipher, OsRandom)
    }
}

impl Default for VeilEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CipherProvider, R: RandomSource> VeilEngine<C, R> {
    pub fn with_parts(cipher: C, random: R) -> Self {
        Self {
            cipher,
            random,
            kdf: KdfParams::default(),
        }
    }

    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf = params;
        self
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    /// Build a package from `request`, encrypting the hidden image under `passphrase`.
    ///
    /// # Errors
    ///
    /// - `VeilError::MissingInput` if either image is absent or empty
    /// - `VeilError::WeakOrMissingKey` if the passphrase is empty
    /// - `VeilError::InvalidParameters` if a supplied salt has the wrong length
    /// - `VeilError::Random` if the random source fails
    pub fn build(&self, request: &PackageRequest, passphrase: &SecretString) -> Result<VeilPackage> {
        let (salt, nonce) = self.prepare(request, passphrase)?;
        let key = derive_key(passphrase.expose_secret(), &salt, &self.kdf)?;
        self.seal(request, salt, nonce, &key)
    }

    /// Same as [`build`](Self::build), with the key derivation on tokio's blocking pool.
    pub async fn build_async(
        &self,
        request: &PackageRequest,
        passphrase: SecretString,
    ) -> Result<VeilPackage> {
        let (salt, nonce) = self.prepare(request, &passphrase)?;
        let key = derive_key_async(passphrase, salt.clone(), self.kdf).await?;
        self.seal(request, salt, nonce, &key)
    }

    /// Unlock the hidden image with a passphrase attempt.
    ///
    /// Does not check the stored checksum; see [`reveal_checked`](Self::reveal_checked).
    ///
    /// # Errors
    ///
    /// Returns `VeilError::UnlockFailed` for every failure, whether the
    /// passphrase, salt, nonce or ciphertext was at fault.
    pub fn reveal(&self, package: &VeilPackage, passphrase: &SecretString) -> Result<RevealedImage> {
        let key = derive_key(passphrase.expose_secret(), &package.meta().salt, &self.kdf)
            .map_err(|_| VeilError::UnlockFailed)?;
        self.open(package, &key)
    }

    /// Same as [`reveal`](Self::reveal), with the key derivation on tokio's blocking pool.
    pub async fn reveal_async(
        &self,
        package: &VeilPackage,
        passphrase: SecretString,
    ) -> Result<RevealedImage> {
        let key = derive_key_async(passphrase, package.meta().salt.clone(), self.kdf)
            .await
            .map_err(|_| VeilError::UnlockFailed)?;
        self.open(package, &key)
    }

    /// Verify the checksum and attempt an unlock, reporting both.
    pub fn reveal_checked(&self, package: &VeilPackage, passphrase: &SecretString) -> RevealReport {
        let integrity = match package.verify_integrity() {
            Ok(()) => IntegrityStatus::Verified,
            Err(VeilError::IntegrityMismatch { expected, actual }) => {
                IntegrityStatus::Mismatch { expected, actual }
            }
            Err(err) => {
                return RevealReport {
                    integrity: IntegrityStatus::Unchecked,
                    unlock: Err(err),
                }
            }
        };
        RevealReport {
            integrity,
            unlock: self.reveal(package, passphrase),
        }
    }

    fn prepare(
        &self,
        request: &PackageRequest,
        passphrase: &SecretString,
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        if request.base_image.as_ref().map_or(true, Vec::is_empty) {
            return Err(VeilError::MissingInput("base image is required".to_string()));
        }
        if request
            .hidden_image
            .as_ref()
            .map_or(true, |bytes| bytes.is_empty())
        {
            return Err(VeilError::MissingInput(
                "hidden image is required".to_string(),
            ));
        }
        debug!(glyph = %request.glyph, "images loaded");

        validate_passphrase(passphrase.expose_secret())?;

        let salt = match &request.salt {
            Some(salt) if salt.len() != SALT_SIZE => {
                return Err(VeilError::InvalidParameters(format!(
                    "Salt must be {} bytes (got {})",
                    SALT_SIZE,
                    salt.len()
                )));
            }
            Some(salt) => salt.clone(),
            None => self.random.bytes(SALT_SIZE)?,
        };
        let nonce = self.random.bytes(self.cipher.nonce_len())?;

        Ok((salt, nonce))
    }

    fn seal(
        &self,
        request: &PackageRequest,
        salt: Vec<u8>,
        nonce: Vec<u8>,
        key: &DerivedKey,
    ) -> Result<VeilPackage> {
        let (Some(base_image), Some(hidden_image)) = (&request.base_image, &request.hidden_image)
        else {
            return Err(VeilError::MissingInput(
                "base and hidden images are required".to_string(),
            ));
        };

        let hidden_ciphertext = self.cipher.encrypt(key.as_bytes(), &nonce, hidden_image)?;
        let checksum = sha256_hex(&hidden_ciphertext);
        debug!(ciphertext_bytes = hidden_ciphertext.len(), "hidden image encrypted");

        let package = VeilPackage::from_parts(
            FORMAT_VERSION.to_string(),
            VeilMeta {
                glyph: request.glyph.clone(),
                phrase: request.phrase.clone(),
                roles: request.roles.clone(),
                salt,
                nonce,
                checksum,
            },
            request.base_media_type.clone(),
            base_image.clone(),
            hidden_ciphertext,
        );
        info!(
            glyph = %package.meta().glyph,
            base_bytes = package.base_image().len(),
            ciphertext_bytes = package.hidden_ciphertext().len(),
            "package built"
        );
        Ok(package)
    }

    fn open(&self, package: &VeilPackage, key: &DerivedKey) -> Result<RevealedImage> {
        let meta = package.meta();
        match self
            .cipher
            .decrypt(key.as_bytes(), &meta.nonce, package.hidden_ciphertext())
        {
            Ok(bytes) => {
                info!(glyph = %meta.glyph, "package unlocked");
                Ok(RevealedImage {
                    bytes: Zeroizing::new(bytes),
                })
            }
            Err(_) => {
                debug!(glyph = %meta.glyph, "unlock attempt failed");
                Err(VeilError::UnlockFailed)
            }
        }
    }
}
