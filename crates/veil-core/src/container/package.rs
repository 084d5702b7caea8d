//! In-memory package model.

use serde::Serialize;

use crate::codec::encode_base64;
use crate::digest::sha256_hex;
use crate::error::{Result, VeilError};

/// Package metadata. Nothing here is secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VeilMeta {
    pub glyph: String,
    pub phrase: String,
    /// Advisory viewer roles; not enforced cryptographically.
    pub roles: Vec<String>,
    pub salt: Vec<u8>,
    pub nonce: Vec<u8>,
    /// Lowercase hex SHA-256 of the hidden ciphertext, taken at build time.
    pub checksum: String,
}

/// A parsed or freshly built package.
///
/// Immutable once constructed: reveal reads it but never writes plaintext
/// or any other state back into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VeilPackage {
    format_version: String,
    meta: VeilMeta,
    base_media_type: Option<String>,
    base_image: Vec<u8>,
    hidden_ciphertext: Vec<u8>,
}

/// Display-safe overview of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub format_version: String,
    pub glyph: String,
    pub phrase: String,
    pub roles: Vec<String>,
    pub salt: String,
    pub nonce: String,
    pub checksum: String,
    pub base_image_media_type: Option<String>,
    pub base_image_bytes: usize,
    pub hidden_ciphertext_bytes: usize,
}

impl VeilPackage {
    pub(crate) fn from_parts(
        format_version: String,
        meta: VeilMeta,
        base_media_type: Option<String>,
        base_image: Vec<u8>,
        hidden_ciphertext: Vec<u8>,
    ) -> Self {
        Self {
            format_version,
            meta,
            base_media_type,
            base_image,
            hidden_ciphertext,
        }
    }

    pub fn format_version(&self) -> &str {
        &self.format_version
    }

    pub fn meta(&self) -> &VeilMeta {
        &self.meta
    }

    /// Media type of the base image, when it was known at build time.
    pub fn base_media_type(&self) -> Option<&str> {
        self.base_media_type.as_deref()
    }

    /// The always-visible base image bytes.
    pub fn base_image(&self) -> &[u8] {
        &self.base_image
    }

    /// Ciphertext with the authentication tag appended.
    pub fn hidden_ciphertext(&self) -> &[u8] {
        &self.hidden_ciphertext
    }

    /// Recompute the ciphertext checksum and compare it with the stored one.
    ///
    /// This is independent of unlocking: it needs no passphrase and says
    /// nothing about whether a given passphrase is correct.
    ///
    /// # Errors
    ///
    /// Returns `VeilError::IntegrityMismatch` if the ciphertext was altered
    /// after the package was built.
    pub fn verify_integrity(&self) -> Result<()> {
        let actual = sha256_hex(&self.hidden_ciphertext);
        if actual.eq_ignore_ascii_case(&self.meta.checksum) {
            Ok(())
        } else {
            tracing::warn!(glyph = %self.meta.glyph, "package checksum mismatch");
            Err(VeilError::IntegrityMismatch {
                expected: self.meta.checksum.clone(),
                actual,
            })
        }
    }

    pub fn summary(&self) -> PackageSummary {
        PackageSummary {
            format_version: self.format_version.clone(),
            glyph: self.meta.glyph.clone(),
            phrase: self.meta.phrase.clone(),
            roles: self.meta.roles.clone(),
            salt: encode_base64(&self.meta.salt),
            nonce: encode_base64(&self.meta.nonce),
            checksum: self.meta.checksum.clone(),
            base_image_media_type: self.base_media_type.clone(),
            base_image_bytes: self.base_image.len(),
            hidden_ciphertext_bytes: self.hidden_ciphertext.len(),
        }
    }
}
