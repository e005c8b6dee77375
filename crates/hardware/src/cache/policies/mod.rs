//! Cache Replacement Policies.
//!
//! Implements the algorithms that order lines within a set and pick victims.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used.
//! - `Lip`: LRU Insertion Policy, and its bimodal form `Bip`.
//! - `Mru`: Most Recently Used.
//! - `Fifo`: First-In, First-Out.
//! - `Plru`: Bit pseudo-LRU.
//! - `Random`: Seeded random selection.
//! - `Srrip` / `Brrip`: Re-reference interval prediction.
//!
//! Every policy keeps its metadata per set and is driven through the three
//! calls of [`ReplacementPolicy`]. Victims are chosen deterministically: ties
//! go to the lowest way, and randomized policies draw from a seeded generator.

use std::fmt;

use crate::common::error::ConfigError;
use crate::config::PolicyConfig;

/// First-In, First-Out replacement policy.
pub mod fifo;

/// LRU Insertion Policy (and Bimodal Insertion Policy).
pub mod lip;

/// Least Recently Used replacement policy.
pub mod lru;

/// Most Recently Used replacement policy.
pub mod mru;

/// Bit pseudo-LRU replacement policy.
pub mod plru;

/// Random replacement policy.
pub mod random;

/// Re-reference interval prediction (SRRIP and BRRIP).
pub mod rrip;

/// Per-set recency stacks shared by the stack-based policies.
pub mod stack;

pub use fifo::FifoPolicy;
pub use lip::LipPolicy;
pub use lru::LruPolicy;
pub use mru::MruPolicy;
pub use plru::PlruPolicy;
pub use random::RandomPolicy;
pub use rrip::RripPolicy;
pub use stack::RecencyStacks;

/// Trait for cache replacement policies.
///
/// The cache model calls `on_access` on every hit, `on_insert` after every
/// fill (into a free way or a victim's way), and `select_victim` only when the
/// set is full. A policy never sees tags; it orders way indices.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Updates metadata after a hit on `way` in `set`.
    fn on_access(&mut self, set: usize, way: usize);

    /// Initializes metadata for a line just placed in `way` of `set`.
    fn on_insert(&mut self, set: usize, way: usize);

    /// Chooses the way to evict from a full `set`.
    ///
    /// Must return an index in `0..ways`.
    fn select_victim(&mut self, set: usize) -> usize;

    /// Notes that `way` in `set` was invalidated.
    ///
    /// The way will be refilled through `on_insert` before it is next used.
    fn on_invalidate(&mut self, _set: usize, _way: usize) {}

    /// Short lowercase policy name.
    fn name(&self) -> &'static str;
}

/// Instantiates a single (non-dueling) policy for a `sets` x `ways` cache.
///
/// # Errors
///
/// Returns `ConfigError::NestedDueling` for `PolicyConfig::Dueling`; duels
/// are assembled by the cache model from two single policies.
pub fn build(
    config: &PolicyConfig,
    sets: usize,
    ways: usize,
) -> Result<Box<dyn ReplacementPolicy>, ConfigError> {
    let policy: Box<dyn ReplacementPolicy> = match *config {
        PolicyConfig::Lru => Box::new(LruPolicy::new(sets, ways)),
        PolicyConfig::Lip => Box::new(LipPolicy::new(sets, ways)),
        PolicyConfig::Bip { btp, seed } => Box::new(LipPolicy::bimodal(sets, ways, btp, seed)),
        PolicyConfig::Mru => Box::new(MruPolicy::new(sets, ways)),
        PolicyConfig::Fifo => Box::new(FifoPolicy::new(sets, ways)),
        PolicyConfig::Plru => Box::new(PlruPolicy::new(sets, ways)),
        PolicyConfig::Random { seed } => Box::new(RandomPolicy::new(sets, ways, seed)),
        PolicyConfig::Srrip { rrpv_bits } => Box::new(RripPolicy::srrip(sets, ways, rrpv_bits)?),
        PolicyConfig::Brrip {
            rrpv_bits,
            btp,
            seed,
        } => Box::new(RripPolicy::brrip(sets, ways, rrpv_bits, btp, seed)?),
        PolicyConfig::Dueling(_) => return Err(ConfigError::NestedDueling),
    };
    Ok(policy)
}
