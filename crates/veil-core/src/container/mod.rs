//! The Veil Package container.
//!
//! A package binds a visible base image to a hidden image encrypted under a
//! passphrase-derived key. This module holds:
//!
//! - **package**: the in-memory [`VeilPackage`] model and its integrity check
//! - **format**: the versioned JSON wire format (parse and serialize)
//! - **request**: the [`PackageRequest`] builder feeding the build flow
//! - **engine**: [`VeilEngine`], which runs the build and reveal flows with
//!   injected cipher and random capabilities
//!
//! ## Flows
//!
//! Build: `Empty → ImagesLoaded → Encrypted → Serialized`
//!
//! Reveal: `Serialized → Parsed → Unlocked | Failed`

mod engine;
mod format;
mod package;
mod request;

pub use engine::{IntegrityStatus, RevealReport, RevealedImage, VeilEngine};
pub use format::{FORMAT_VERSION, PACKAGE_EXTENSION};
pub use package::{PackageSummary, VeilMeta, VeilPackage};
pub use request::{PackageRequest, DEFAULT_GLYPH, DEFAULT_PHRASE, DEFAULT_ROLE};

/// Salt length stored in a package.
pub const SALT_SIZE: usize = 16;
