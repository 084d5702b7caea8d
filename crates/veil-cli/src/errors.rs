//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use veil_core::error::UNLOCK_FAILED_MESSAGE;
use veil_core::VeilError;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Package, image or config file not found
    NotFound { message: String, hint: String },

    /// Unlock failed (wrong passphrase or damaged package, too many attempts)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput {
        message: String,
        hint: Option<String>,
    },

    /// Stored checksum does not match the ciphertext
    IntegrityFailed { message: String, hint: String },

    /// Package file could not be parsed
    Malformed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } | CliError::IntegrityFailed { message, hint } => {
                write!(f, "{}\nHint: {}", message, hint)
            }
            CliError::AuthFailed { message, hint } | CliError::InvalidInput { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\nHint: {}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::Malformed(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: None,
        }
    }

    pub fn invalid_input_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Map a core error to its CLI counterpart.
    ///
    /// Returns `None` for errors with no dedicated exit code (I/O, key
    /// derivation plumbing, randomness), which fall through to anyhow.
    pub fn from_core(err: &VeilError) -> Option<Self> {
        let mapped = match err {
            VeilError::NotFound(path) => {
                CliError::not_found(format!("No package found at {}", path), "Check the path")
            }
            VeilError::UnlockFailed | VeilError::AuthenticationFailed => CliError::AuthFailed {
                message: UNLOCK_FAILED_MESSAGE.to_string(),
                hint: None,
            },
            VeilError::IntegrityMismatch { expected, actual } => CliError::IntegrityFailed {
                message: format!(
                    "Integrity check failed (stored {}, computed {})",
                    expected, actual
                ),
                hint: "The package was altered after it was built".to_string(),
            },
            VeilError::MalformedContainer(message) | VeilError::MalformedEncoding(message) => {
                CliError::Malformed(format!("Not a valid Veil package: {}", message))
            }
            VeilError::MissingInput(_)
            | VeilError::WeakOrMissingKey(_)
            | VeilError::InvalidParameters(_) => CliError::invalid_input(err.to_string()),
            _ => return None,
        };
        Some(mapped)
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput { .. } => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed { .. } => exit_codes::INTEGRITY_FAILED,
            CliError::Malformed(_) => exit_codes::MALFORMED,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::exit_codes;

    #[test]
    fn test_unlock_failures_share_one_message() {
        let a = CliError::from_core(&VeilError::UnlockFailed).unwrap();
        let b = CliError::from_core(&VeilError::AuthenticationFailed).unwrap();
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "Invalid key or corrupted package");
        assert_eq!(a.exit_code(), exit_codes::AUTH_FAILED);
    }

    #[test]
    fn test_core_exit_codes() {
        let cases = [
            (VeilError::NotFound("x".into()), exit_codes::NOT_FOUND),
            (
                VeilError::IntegrityMismatch {
                    expected: "a".into(),
                    actual: "b".into(),
                },
                exit_codes::INTEGRITY_FAILED,
            ),
            (
                VeilError::MalformedContainer("bad".into()),
                exit_codes::MALFORMED,
            ),
            (
                VeilError::WeakOrMissingKey("empty".into()),
                exit_codes::INVALID_INPUT,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(CliError::from_core(&err).unwrap().exit_code(), code);
        }
    }

    #[test]
    fn test_plumbing_errors_fall_through() {
        assert!(CliError::from_core(&VeilError::Random("os".into())).is_none());
    }

    #[test]
    fn test_display_includes_hint() {
        let err = CliError::not_found("No package found at x", "Check the path");
        assert_eq!(err.to_string(), "No package found at x\nHint: Check the path");
    }
}
