//! Cryptographic operations for Veil.
//!
//! This module provides key derivation and authenticated encryption using
//! well-audited RustCrypto implementations:
//! - **PBKDF2-HMAC-SHA256**: salted, iterated passphrase stretching
//! - **AES-256-GCM**: authenticated encryption of the hidden image
//!
//! ## Security Model
//!
//! - The passphrase is never stored; it is re-supplied on every reveal
//! - Salt and nonce are stored in the package, one pair per encryption
//! - Derived keys and decrypted plaintext are zeroized on drop
//! - Decryption failures never say why they failed
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of a package file
//! - Offline brute-force of the passphrase (iteration count)
//! - Tampering with the ciphertext in transit
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Weak passphrases chosen despite the policy

pub mod cipher;
pub mod kdf;
pub mod passphrase;

pub use cipher::{AesGcmCipher, CipherProvider, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use kdf::{derive_key, derive_key_async, DerivedKey, KdfParams, DEFAULT_ITERATIONS};
pub use passphrase::{validate_passphrase, PassphrasePolicy, DEFAULT_MIN_PASSPHRASE_LENGTH};
