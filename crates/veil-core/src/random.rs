//! Random byte sources for salts and nonces.
//!
//! The container engine never reaches for ambient randomness; it draws from
//! an injected [`RandomSource`]. Production code uses [`OsRandom`]. Tests
//! can use [`SeededRandom`] or [`FixedRandom`] for reproducible packages.

use std::sync::Mutex;

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng, TryRngCore};

use crate::error::{Result, VeilError};

/// Source of random bytes for salts and nonces.
///
/// Implementations must be safe to share between threads and must never
/// hand the same output to two concurrent callers.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()>;

    /// Convenience: allocate and fill `len` random bytes.
    fn bytes(&self, len: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.fill_bytes(&mut out)?;
        Ok(out)
    }
}

/// Operating-system CSPRNG. Each call reads fresh entropy; no state is shared.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| VeilError::Random(format!("OS random source failed: {}", e)))
    }
}

/// Deterministic generator seeded from a `u64`.
///
/// The generator sits behind a mutex so concurrent callers each get a
/// distinct slice of the stream. Not for production packages.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| VeilError::Random("Seeded generator lock poisoned".to_string()))?;
        rng.fill_bytes(dest);
        Ok(())
    }
}

/// Fills every request with the same byte. Test-only double.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    byte: u8,
}

impl FixedRandom {
    pub fn new(byte: u8) -> Self {
        Self { byte }
    }

    /// All-zero output.
    pub fn zeros() -> Self {
        Self::new(0)
    }
}

impl RandomSource for FixedRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        dest.fill(self.byte);
        Ok(())
    }
}
