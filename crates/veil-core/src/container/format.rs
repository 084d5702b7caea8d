//! Versioned JSON wire format.
//!
//! ```text
//! {
//!   "formatVersion": "0.1-json",
//!   "meta": {
//!     "glyph": "...", "phrase": "...", "roles": ["..."],
//!     "salt": "<base64, 16 bytes>",
//!     "nonce": "<base64, 12 bytes>",
//!     "checksum": "<hex sha-256 of hiddenCiphertext>"
//!   },
//!   "baseImage": "data:<type>;base64,..." | "<base64>",
//!   "hiddenCiphertext": "<base64 ciphertext || tag>"
//! }
//! ```
//!
//! `roles` may be absent or null. Unknown fields are ignored. Field names
//! written by the `.ovp.json` prototype are accepted on input.

use serde::{Deserialize, Serialize};

use crate::codec::{decode_base64, decode_image, encode_base64, encode_image};
use crate::crypto::NONCE_SIZE;
use crate::digest::is_checksum_hex;
use crate::error::{Result, VeilError};

use super::package::{VeilMeta, VeilPackage};
use super::SALT_SIZE;

/// The only recognized format version.
pub const FORMAT_VERSION: &str = "0.1-json";

/// Conventional file extension for serialized packages.
pub const PACKAGE_EXTENSION: &str = "veil.json";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionProbe {
    #[serde(alias = "ovpVersion")]
    format_version: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePackage {
    #[serde(alias = "ovpVersion")]
    format_version: String,
    meta: WireMeta,
    #[serde(alias = "basePngB64")]
    base_image: String,
    #[serde(alias = "spectralCipherB64")]
    hidden_ciphertext: String,
}

#[derive(Serialize, Deserialize)]
struct WireMeta {
    glyph: String,
    phrase: String,
    #[serde(default)]
    roles: Option<Vec<String>>,
    #[serde(alias = "saltB64")]
    salt: String,
    #[serde(alias = "ivB64")]
    nonce: String,
    #[serde(alias = "checksumSha256Hex")]
    checksum: String,
}

fn malformed(message: impl Into<String>) -> VeilError {
    VeilError::MalformedContainer(message.into())
}

fn decode_field(name: &str, text: &str) -> Result<Vec<u8>> {
    decode_base64(text).map_err(|e| malformed(format!("{}: {}", name, e)))
}

impl VeilPackage {
    /// Parse a serialized package.
    ///
    /// # Errors
    ///
    /// Returns `VeilError::MalformedContainer` if the text is not JSON, a
    /// required field is missing or has the wrong type, a binary field is
    /// not valid base64 or has the wrong length, the checksum is not a hex
    /// SHA-256 digest, or the format version is not recognized.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_slice(text.as_bytes())
    }

    /// Parse a serialized package from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let probe: VersionProbe = serde_json::from_slice(bytes)
            .map_err(|e| malformed(format!("not a package document: {}", e)))?;
        match probe.format_version {
            None => return Err(malformed("missing field `formatVersion`")),
            Some(serde_json::Value::String(version)) if version == FORMAT_VERSION => {}
            Some(serde_json::Value::String(version)) => {
                return Err(malformed(format!(
                    "unsupported format version `{}` (expected `{}`)",
                    version, FORMAT_VERSION
                )))
            }
            Some(_) => return Err(malformed("`formatVersion` must be a string")),
        }

        let wire: WirePackage =
            serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;

        let salt = decode_field("meta.salt", &wire.meta.salt)?;
        if salt.len() != SALT_SIZE {
            return Err(malformed(format!(
                "meta.salt must decode to {} bytes (got {})",
                SALT_SIZE,
                salt.len()
            )));
        }
        let nonce = decode_field("meta.nonce", &wire.meta.nonce)?;
        if nonce.len() != NONCE_SIZE {
            return Err(malformed(format!(
                "meta.nonce must decode to {} bytes (got {})",
                NONCE_SIZE,
                nonce.len()
            )));
        }
        if !is_checksum_hex(&wire.meta.checksum) {
            return Err(malformed("meta.checksum must be a 64-character hex digest"));
        }
        let (base_media_type, base_image) =
            decode_image(&wire.base_image).map_err(|e| malformed(format!("baseImage: {}", e)))?;
        let hidden_ciphertext = decode_field("hiddenCiphertext", &wire.hidden_ciphertext)?;

        tracing::debug!(
            glyph = %wire.meta.glyph,
            ciphertext_bytes = hidden_ciphertext.len(),
            "parsed package"
        );

        Ok(VeilPackage::from_parts(
            wire.format_version,
            VeilMeta {
                glyph: wire.meta.glyph,
                phrase: wire.meta.phrase,
                roles: wire.meta.roles.unwrap_or_default(),
                salt,
                nonce,
                checksum: wire.meta.checksum.to_ascii_lowercase(),
            },
            base_media_type,
            base_image,
            hidden_ciphertext,
        ))
    }

    fn to_wire(&self) -> WirePackage {
        let meta = self.meta();
        WirePackage {
            format_version: self.format_version().to_string(),
            meta: WireMeta {
                glyph: meta.glyph.clone(),
                phrase: meta.phrase.clone(),
                roles: Some(meta.roles.clone()),
                salt: encode_base64(&meta.salt),
                nonce: encode_base64(&meta.nonce),
                checksum: meta.checksum.clone(),
            },
            base_image: encode_image(self.base_media_type(), self.base_image()),
            hidden_ciphertext: encode_base64(self.hidden_ciphertext()),
        }
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_wire())?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_wire())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::sha256_hex;

    const SALT_B64: &str = "AAAAAAAAAAAAAAAAAAAAAA==";
    const NONCE_B64: &str = "AAAAAAAAAAAAAAAA";

    fn document(version: &str, roles: &str) -> String {
        let checksum = sha256_hex(&[1, 2, 3, 4]);
        format!(
            r#"{{
                "formatVersion": "{version}",
                "meta": {{
                    "glyph": "NAH'NUMA'HA",
                    "phrase": "Through the Veil",
                    {roles}
                    "salt": "{SALT_B64}",
                    "nonce": "{NONCE_B64}",
                    "checksum": "{checksum}"
                }},
                "baseImage": "data:image/png;base64,iVBORw==",
                "hiddenCiphertext": "AQIDBA=="
            }}"#
        )
    }

    #[test]
    fn test_parse_canonical_document() {
        let package =
            VeilPackage::from_json(&document(FORMAT_VERSION, r#""roles": ["Council", "Elder"],"#))
                .unwrap();

        assert_eq!(package.format_version(), FORMAT_VERSION);
        assert_eq!(package.meta().glyph, "NAH'NUMA'HA");
        assert_eq!(package.meta().roles, vec!["Council", "Elder"]);
        assert_eq!(package.meta().salt, vec![0u8; 16]);
        assert_eq!(package.meta().nonce, vec![0u8; 12]);
        assert_eq!(package.base_media_type(), Some("image/png"));
        assert_eq!(package.base_image(), &[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(package.hidden_ciphertext(), &[1, 2, 3, 4]);
        assert!(package.verify_integrity().is_ok());
    }

    #[test]
    fn test_roles_default_to_empty() {
        let package = VeilPackage::from_json(&document(FORMAT_VERSION, "")).unwrap();
        assert!(package.meta().roles.is_empty());

        let package =
            VeilPackage::from_json(&document(FORMAT_VERSION, r#""roles": null,"#)).unwrap();
        assert!(package.meta().roles.is_empty());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let text = document(FORMAT_VERSION, r#""roles": [], "future": {"x": 1},"#);
        assert!(VeilPackage::from_json(&text).is_ok());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let result = VeilPackage::from_json(&document("0.2-json", ""));
        let err = result.unwrap_err();
        assert!(matches!(err, VeilError::MalformedContainer(_)));
        assert!(err.to_string().contains("0.2-json"));
    }

    #[test]
    fn test_missing_version_rejected() {
        let result = VeilPackage::from_json(r#"{"meta": {}}"#);
        assert!(matches!(result, Err(VeilError::MalformedContainer(_))));
    }

    #[test]
    fn test_non_string_version_rejected() {
        let result = VeilPackage::from_json(r#"{"formatVersion": 1}"#);
        assert!(matches!(result, Err(VeilError::MalformedContainer(_))));
    }

    #[test]
    fn test_not_json_rejected() {
        let result = VeilPackage::from_json("definitely not json");
        assert!(matches!(result, Err(VeilError::MalformedContainer(_))));
    }

    #[test]
    fn test_missing_field_rejected() {
        let text = document(FORMAT_VERSION, "").replace(r#""hiddenCiphertext": "AQIDBA==""#, r#""x": 0"#);
        let result = VeilPackage::from_json(&text);
        assert!(matches!(result, Err(VeilError::MalformedContainer(_))));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let text = document(FORMAT_VERSION, r#""roles": "Council","#);
        let result = VeilPackage::from_json(&text);
        assert!(matches!(result, Err(VeilError::MalformedContainer(_))));
    }

    #[test]
    fn test_bad_base64_rejected() {
        let text = document(FORMAT_VERSION, "").replace("AQIDBA==", "AQ*DBA==");
        let result = VeilPackage::from_json(&text);
        assert!(matches!(result, Err(VeilError::MalformedContainer(_))));
    }

    #[test]
    fn test_short_salt_rejected() {
        let text = document(FORMAT_VERSION, "").replace(SALT_B64, "AAAA");
        let err = VeilPackage::from_json(&text).unwrap_err();
        assert!(err.to_string().contains("meta.salt"));
    }

    #[test]
    fn test_short_nonce_rejected() {
        let text = document(FORMAT_VERSION, "").replace(
            &format!(r#""nonce": "{NONCE_B64}""#),
            r#""nonce": "AAAA""#,
        );
        let err = VeilPackage::from_json(&text).unwrap_err();
        assert!(err.to_string().contains("meta.nonce"));
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let checksum = sha256_hex(&[1, 2, 3, 4]);
        let text = document(FORMAT_VERSION, "").replace(&checksum, "abc");
        let result = VeilPackage::from_json(&text);
        assert!(matches!(result, Err(VeilError::MalformedContainer(_))));
    }

    #[test]
    fn test_prototype_field_names_accepted() {
        let checksum = sha256_hex(&[1, 2, 3, 4]);
        let text = format!(
            r#"{{
                "ovpVersion": "0.1-json",
                "meta": {{
                    "glyph": "NAH'NUMA'HA",
                    "phrase": "Through the Veil, We Walk Unseen",
                    "roles": ["Council"],
                    "saltB64": "{SALT_B64}",
                    "ivB64": "{NONCE_B64}",
                    "checksumSha256Hex": "{checksum}"
                }},
                "basePngB64": "data:image/png;base64,iVBORw==",
                "spectralCipherB64": "AQIDBA=="
            }}"#
        );

        let package = VeilPackage::from_json(&text).unwrap();
        assert_eq!(package.meta().roles, vec!["Council"]);
        assert_eq!(package.hidden_ciphertext(), &[1, 2, 3, 4]);

        // Output always uses the canonical names.
        let json = package.to_json().unwrap();
        assert!(json.contains("\"formatVersion\""));
        assert!(json.contains("\"hiddenCiphertext\""));
        assert!(!json.contains("ovpVersion"));
    }

    #[test]
    fn test_serialize_parse_preserves_package() {
        let package =
            VeilPackage::from_json(&document(FORMAT_VERSION, r#""roles": ["Council"],"#)).unwrap();
        let reparsed = VeilPackage::from_json(&package.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, package);

        let reparsed = VeilPackage::from_json(&package.to_json_pretty().unwrap()).unwrap();
        assert_eq!(reparsed, package);
    }

    #[test]
    fn test_serialized_field_layout() {
        let package = VeilPackage::from_json(&document(FORMAT_VERSION, "")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&package.to_json().unwrap()).unwrap();

        assert_eq!(value["formatVersion"], FORMAT_VERSION);
        assert_eq!(value["meta"]["salt"], SALT_B64);
        assert_eq!(value["meta"]["nonce"], NONCE_B64);
        assert_eq!(value["meta"]["roles"], serde_json::json!([]));
        assert_eq!(value["baseImage"], "data:image/png;base64,iVBORw==");
        assert_eq!(value["hiddenCiphertext"], "AQIDBA==");
    }
}
