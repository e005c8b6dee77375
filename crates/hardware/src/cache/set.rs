//! Cache sets and lines.
//!
//! A set is a fixed row of `ways` lines created once at construction and
//! never resized. Lines hold only validity and a tag; replacement metadata
//! lives in the policy, keyed by set and way.

use crate::common::error::AccessError;

/// Cache line entry containing tag and validity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Tag of the resident line; meaningless when `valid` is false.
    pub tag: u64,
    /// Whether the line holds data.
    pub valid: bool,
}

/// One associativity set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSet {
    index: usize,
    lines: Vec<CacheLine>,
}

impl CacheSet {
    /// Creates an empty set with `ways` invalid lines.
    pub fn new(index: usize, ways: usize) -> Self {
        Self {
            index,
            lines: vec![CacheLine::default(); ways],
        }
    }

    /// Index of this set within the cache.
    #[inline]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// All lines, in way order.
    #[inline]
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Way holding a valid line with `tag`, if any.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|l| l.valid && l.tag == tag)
    }

    /// Lowest invalid way, if any.
    pub fn free_way(&self) -> Option<usize> {
        self.lines.iter().position(|l| !l.valid)
    }

    /// Number of valid lines.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|l| l.valid).count()
    }

    /// True when every way holds a valid line.
    pub fn is_full(&self) -> bool {
        self.lines.iter().all(|l| l.valid)
    }

    /// Asks `pick` for a victim and checks the answer.
    ///
    /// `pick` receives the set index and returns a way.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NoValidLine` without calling `pick` when the set
    /// holds no valid line, and `AccessError::InvalidVictim` if `pick` names a
    /// way that is out of range or not valid.
    pub fn choose_victim(
        &self,
        pick: impl FnOnce(usize) -> usize,
    ) -> Result<usize, AccessError> {
        if !self.lines.iter().any(|l| l.valid) {
            return Err(AccessError::NoValidLine { set: self.index });
        }
        let way = pick(self.index);
        match self.lines.get(way) {
            Some(line) if line.valid => Ok(way),
            _ => Err(AccessError::InvalidVictim {
                set: self.index,
                way,
            }),
        }
    }

    /// Places `tag` in `way`, returning the tag it displaced if the way was valid.
    pub fn fill(&mut self, way: usize, tag: u64) -> Option<u64> {
        let line = &mut self.lines[way];
        let displaced = line.valid.then_some(line.tag);
        *line = CacheLine { tag, valid: true };
        displaced
    }

    /// Invalidates `way`, returning the tag it held if it was valid.
    pub fn invalidate(&mut self, way: usize) -> Option<u64> {
        let line = &mut self.lines[way];
        let held = line.valid.then_some(line.tag);
        line.valid = false;
        held
    }
}
