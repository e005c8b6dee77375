//! Per-set recency stacks.
//!
//! Each set keeps a permutation of its way indices. Index 0 is the
//! most-recently-used (MRU) position and the last index is the
//! least-recently-used (LRU) position. LRU, LIP, MRU and FIFO differ only in
//! which events move a way and in which direction.

/// A recency stack for every set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecencyStacks {
    /// One stack per set. Index 0 is MRU, last index is LRU.
    usage: Vec<Vec<usize>>,
}

impl RecencyStacks {
    /// Creates stacks for `sets` sets of `ways` ways, ordered `[0, 1, .., ways - 1]`.
    pub fn new(sets: usize, ways: usize) -> Self {
        let mut usage = Vec::with_capacity(sets);
        for _ in 0..sets {
            usage.push((0..ways).collect());
        }
        Self { usage }
    }

    /// Moves `way` to the MRU position, shifting the ways above it down.
    pub fn promote(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            stack[..=pos].rotate_right(1);
        }
    }

    /// Moves `way` to the LRU position, shifting the ways below it up.
    pub fn demote(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            stack[pos..].rotate_left(1);
        }
    }

    /// Way at the LRU position.
    #[inline]
    pub fn lru(&self, set: usize) -> usize {
        self.usage[set].last().copied().unwrap_or(0)
    }

    /// Way at the MRU position.
    #[inline]
    pub fn mru(&self, set: usize) -> usize {
        self.usage[set].first().copied().unwrap_or(0)
    }

    /// Stack for `set`, MRU first.
    pub fn order(&self, set: usize) -> &[usize] {
        &self.usage[set]
    }
}
