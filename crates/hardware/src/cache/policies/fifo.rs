//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the oldest line in a set, regardless of how recently
//! it was accessed. Only insertions reorder the queue; hits do not.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_access()`: O(1)
//!   - `on_insert()`: O(W)
//!   - `select_victim()`: O(1)
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict frequently-used lines)

use super::{RecencyStacks, ReplacementPolicy};

/// FIFO Policy state.
///
/// The recency stack is used as an insertion queue: the newest line sits at
/// the front and the oldest at the back.
#[derive(Debug, Clone)]
pub struct FifoPolicy {
    queue: RecencyStacks,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            queue: RecencyStacks::new(sets, ways),
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn on_access(&mut self, _set: usize, _way: usize) {}

    fn on_insert(&mut self, set: usize, way: usize) {
        self.queue.promote(set, way);
    }

    /// Returns the way inserted longest ago.
    fn select_victim(&mut self, set: usize) -> usize {
        self.queue.lru(set)
    }

    fn on_invalidate(&mut self, set: usize, way: usize) {
        self.queue.demote(set, way);
    }

    fn name(&self) -> &'static str {
        "fifo"
    }
}
