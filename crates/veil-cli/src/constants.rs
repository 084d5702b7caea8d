//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Package, image or config file not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Unlock failed (wrong passphrase or damaged package, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// Stored checksum does not match the ciphertext.
    pub const INTEGRITY_FAILED: i32 = 6;

    /// Package file could not be parsed.
    pub const MALFORMED: i32 = 7;
}

/// Environment variable supplying the passphrase non-interactively.
pub const PASSPHRASE_ENV: &str = "VEIL_PASSPHRASE";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "VEIL_CONFIG";

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "VEIL_LOG";

/// Interactive unlock attempts before giving up.
pub const MAX_UNLOCK_ATTEMPTS: u32 = 3;
