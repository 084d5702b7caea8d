//! UI primitives for the Veil CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges and text styles
//! - **Render**: Headers, receipts, hints, field tables
//! - **Progress**: Spinner for key derivation
//! - **Format**: String utilities
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{header, receipt, UiContext};
//!
//! let ctx = app.ui(args.json);
//! if ctx.mode.is_json() {
//!     println!("{}", serde_json::to_string_pretty(&value)?);
//!     return Ok(());
//! }
//! println!("{}", header(&ctx, "inspect", Some(&path)));
//! ```

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use theme::Badge;

pub use render::{badge, field_table, header, hint, kv, print, print_error, receipt};

pub use progress::Spinner;

pub use format::{format_bytes, short_digest};
