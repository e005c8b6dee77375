//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache line that has not been touched for the longest time.
//! It maintains a usage stack for each set. When a line is accessed or inserted, it
//! is moved to the top (Most Recently Used position). The bottom of the stack
//! represents the Least Recently Used line.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_access()` / `on_insert()`: O(W) where W is the number of ways (associativity)
//!   - `select_victim()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Working sets that fit in the set, strong temporal locality
//! - **Worst Case:** Cyclic patterns one line larger than the associativity (every access misses)

use super::{RecencyStacks, ReplacementPolicy};

/// LRU Policy state.
#[derive(Debug, Clone)]
pub struct LruPolicy {
    stacks: RecencyStacks,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
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

    /// Recency order of `set`, MRU first.
    pub fn order(&self, set: usize) -> &[usize] {
        self.stacks.order(set)
    }
}

impl ReplacementPolicy for LruPolicy {
    fn on_access(&mut self, set: usize, way: usize) {
        self.stacks.promote(set, way);
    }

    fn on_insert(&mut self, set: usize, way: usize) {
        self.stacks.promote(set, way);
    }

    /// Returns the way at the bottom of the usage stack (LRU position).
    fn select_victim(&mut self, set: usize) -> usize {
        self.stacks.lru(set)
    }

    fn on_invalidate(&mut self, set: usize, way: usize) {
        self.stacks.demote(set, way);
    }

    fn name(&self) -> &'static str {
        "lru"
    }
}
