//! Random Replacement Policy.
//!
//! Evicts a uniformly chosen way. Keeps no per-line metadata, so hits,
//! insertions and invalidations are ignored. The generator is seeded from the
//! configuration; two caches built with the same seed see the same victims
//! for the same access stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ReplacementPolicy;

/// Random policy state.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    ways: usize,
    rng: StdRng,
}

impl RandomPolicy {
    /// Creates a random policy for a cache with `ways` ways.
    ///
    /// The set count is accepted for symmetry with the other policies; the
    /// generator is shared by every set.
    pub fn new(_sets: usize, ways: usize, seed: u64) -> Self {
        Self {
            ways,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn on_access(&mut self, _set: usize, _way: usize) {}

    fn on_insert(&mut self, _set: usize, _way: usize) {}

    fn select_victim(&mut self, _set: usize) -> usize {
        self.rng.random_range(0..self.ways)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
