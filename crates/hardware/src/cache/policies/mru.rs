//! Most Recently Used (MRU) Replacement Policy.
//!
//! This policy evicts the cache line that was touched most recently.
//! While counter-intuitive for standard workloads, MRU is optimal for
//! cyclic access patterns (loops) where the dataset is larger than the set.
//! In such cases, the most recently used line is the one needed furthest in
//! the future.

use super::{RecencyStacks, ReplacementPolicy};

/// MRU Policy state.
#[derive(Debug, Clone)]
pub struct MruPolicy {
    stacks: RecencyStacks,
}

impl MruPolicy {
    /// Creates a new MRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            stacks: RecencyStacks::new(sets, ways),
        }
    }
}

impl ReplacementPolicy for MruPolicy {
    fn on_access(&mut self, set: usize, way: usize) {
        self.stacks.promote(set, way);
    }

    fn on_insert(&mut self, set: usize, way: usize) {
        self.stacks.promote(set, way);
    }

    /// Returns the way at the top of the usage stack (the Most Recently Used).
    fn select_victim(&mut self, set: usize) -> usize {
        self.stacks.mru(set)
    }

    fn on_invalidate(&mut self, set: usize, way: usize) {
        self.stacks.demote(set, way);
    }

    fn name(&self) -> &'static str {
        "mru"
    }
}
