//! Bit Pseudo-LRU (PLRU) Replacement Policy.
//!
//! PLRU approximates Least Recently Used with one "recently used" bit per way.
//! Touching a way sets its bit; when every bit in the set would be set, all
//! bits except the one just touched are cleared. The victim is the lowest way
//! whose bit is clear.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_access()` / `on_insert()`: O(W)
//!   - `select_victim()`: O(W)
//! - **Space Complexity:** O(S × W) bits
//! - **Best Case:** Similar to LRU for most access patterns
//! - **Worst Case:** Pathological cases can cause premature eviction of useful lines

use super::ReplacementPolicy;

/// PLRU Policy state.
#[derive(Debug, Clone)]
pub struct PlruPolicy {
    /// Recently-used bits, `ways` entries per set.
    used: Vec<bool>,
    /// Number of ways in the cache.
    ways: usize,
}

impl PlruPolicy {
    /// Creates a new PLRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            used: vec![false; sets * ways],
            ways,
        }
    }

    fn touch(&mut self, set: usize, way: usize) {
        let bits = &mut self.used[set * self.ways..(set + 1) * self.ways];
        bits[way] = true;
        if bits.iter().all(|&b| b) {
            bits.fill(false);
            bits[way] = true;
        }
    }
}

impl ReplacementPolicy for PlruPolicy {
    fn on_access(&mut self, set: usize, way: usize) {
        self.touch(set, way);
    }

    fn on_insert(&mut self, set: usize, way: usize) {
        self.touch(set, way);
    }

    /// Returns the lowest way whose recently-used bit is clear.
    fn select_victim(&mut self, set: usize) -> usize {
        let bits = &self.used[set * self.ways..(set + 1) * self.ways];
        bits.iter().position(|&b| !b).unwrap_or(0)
    }

    fn on_invalidate(&mut self, set: usize, way: usize) {
        self.used[set * self.ways + way] = false;
    }

    fn name(&self) -> &'static str {
        "plru"
    }
}
