//! Application-level utilities for the Veil CLI.
//!
//! This module provides:
//! - The per-invocation [`AppContext`] (config, runtime)
//! - Passphrase sourcing with unlock retry

mod context;
mod passphrase;

pub use context::AppContext;
pub use passphrase::{read_new_passphrase, unlock_with_retry};
