//! LRU Insertion Policy (LIP) and Bimodal Insertion Policy (BIP).
//!
//! LIP tracks recency exactly like LRU and evicts the LRU line, but a newly
//! inserted line is placed at the LRU position instead of the MRU position.
//! A line must be hit once before it is promoted, so a streaming scan only
//! ever churns the LRU slot and the rest of the set is left alone.
//!
//! BIP is LIP with a bimodal throttle: with probability `btp` an insertion
//! goes to the MRU position instead. With `btp == 0` it is exactly LIP and no
//! random number is drawn; with `btp == 1` it is exactly LRU.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{RecencyStacks, ReplacementPolicy};

/// LIP / BIP policy state.
#[derive(Debug, Clone)]
pub struct LipPolicy {
    stacks: RecencyStacks,
    /// Probability of inserting at MRU.
    btp: f64,
    /// Insertion coin; only drawn from when `btp > 0`.
    rng: StdRng,
}

impl LipPolicy {
    /// Creates a deterministic LIP policy (`btp == 0`).
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self::bimodal(sets, ways, 0.0, 0)
    }

    /// Creates a BIP policy that inserts at MRU with probability `btp`.
    ///
    /// `btp` is expected in `[0, 1]`; `PolicyConfig::validate` enforces it.
    pub fn bimodal(sets: usize, ways: usize, btp: f64, seed: u64) -> Self {
        Self {
            stacks: RecencyStacks::new(sets, ways),
            btp,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Bimodal throttle probability.
    pub const fn btp(&self) -> f64 {
        self.btp
    }

    /// Recency order of `set`, MRU first.
    pub fn order(&self, set: usize) -> &[usize] {
        self.stacks.order(set)
    }

    fn insert_at_mru(&mut self) -> bool {
        self.btp > 0.0 && self.rng.random::<f64>() < self.btp
    }
}

impl ReplacementPolicy for LipPolicy {
    /// Hits promote to MRU, as in LRU.
    fn on_access(&mut self, set: usize, way: usize) {
        self.stacks.promote(set, way);
    }

    /// Inserts at LRU, or at MRU with probability `btp`.
    fn on_insert(&mut self, set: usize, way: usize) {
        if self.insert_at_mru() {
            self.stacks.promote(set, way);
        } else {
            self.stacks.demote(set, way);
        }
    }

    fn select_victim(&mut self, set: usize) -> usize {
        self.stacks.lru(set)
    }

    fn on_invalidate(&mut self, set: usize, way: usize) {
        self.stacks.demote(set, way);
    }

    fn name(&self) -> &'static str {
        if self.btp > 0.0 { "bip" } else { "lip" }
    }
}
