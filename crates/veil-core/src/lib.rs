//! # Veil Core
//!
//! Core library for Veil - a passphrase-locked image container. A package
//! pairs a visible base image with a hidden image that only opens under the
//! right passphrase.
//!
//! This crate provides the container model, wire format and cryptography
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **codec**: base64, hex and data-URL helpers
//! - **digest**: SHA-256 checksums
//! - **crypto**: PBKDF2 key derivation and AES-256-GCM
//! - **random**: injectable salt and nonce sources
//! - **container**: the package model, JSON format and build/reveal engine
//! - **fs**: atomic package file I/O

pub mod codec;
pub mod container;
pub mod crypto;
pub mod digest;
pub mod error;
pub mod fs;
pub mod random;

pub use container::{PackageRequest, RevealedImage, VeilEngine, VeilPackage};
pub use error::{Result, VeilError};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
