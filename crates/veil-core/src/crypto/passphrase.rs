//! Passphrase validation.
//!
//! The build flow only refuses empty passphrases. Front ends layer a
//! minimum-length policy on top.

use crate::error::{Result, VeilError};

/// Default minimum passphrase length in characters.
pub const DEFAULT_MIN_PASSPHRASE_LENGTH: usize = 8;

/// Reject empty or whitespace-only passphrases.
///
/// # Examples
///
/// ```
/// use veil_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("unseen-walk").is_ok());
/// assert!(validate_passphrase("   ").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(VeilError::WeakOrMissingKey(
            "Passphrase cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Minimum-strength policy applied before building a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassphrasePolicy {
    pub min_length: usize,
}

impl Default for PassphrasePolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSPHRASE_LENGTH,
        }
    }
}

impl PassphrasePolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Check a passphrase against the policy.
    ///
    /// Length is counted in characters, not bytes.
    pub fn check(&self, passphrase: &str) -> Result<()> {
        validate_passphrase(passphrase)?;

        let length = passphrase.chars().count();
        if length < self.min_length {
            return Err(VeilError::WeakOrMissingKey(format!(
                "Passphrase must be at least {} characters (got {})",
                self.min_length, length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_passphrase() {
        assert!(validate_passphrase("unseen-walk").is_ok());
        assert!(validate_passphrase("x").is_ok());
    }

    #[test]
    fn test_passphrase_empty() {
        assert!(matches!(
            validate_passphrase(""),
            Err(VeilError::WeakOrMissingKey(_))
        ));
        assert!(validate_passphrase("   ").is_err());
        assert!(validate_passphrase("\n\t").is_err());
    }

    #[test]
    fn test_policy_too_short() {
        let result = PassphrasePolicy::default().check("short");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 8 characters"));
    }

    #[test]
    fn test_policy_exactly_min_length() {
        assert!(PassphrasePolicy::default().check("12345678").is_ok());
    }

    #[test]
    fn test_policy_counts_characters() {
        // Four characters, twelve bytes.
        let passphrase = "ヴェイル";
        assert!(PassphrasePolicy::new(4).check(passphrase).is_ok());
        assert!(PassphrasePolicy::new(5).check(passphrase).is_err());
    }

    #[test]
    fn test_zero_policy_still_rejects_empty() {
        assert!(PassphrasePolicy::new(0).check("").is_err());
    }
}
