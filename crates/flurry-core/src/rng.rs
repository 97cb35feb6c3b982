//! Seedable random source used for decorative variation.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Deterministic PCG random source.
///
/// Every random decision a scene makes goes through this type so a fixed
/// seed reproduces the same frames.
#[derive(Debug, Clone)]
pub struct SceneRng {
    inner: Pcg32,
    seed: u64,
}

impl SceneRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Use the given seed, or derive one from the system clock.
    pub fn from_seed_or_clock(seed: Option<u64>) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let seed = seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
        Self::new(seed)
    }

    /// Seed this source was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in [0, 1).
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Uniform value in [lo, hi).
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }
}
