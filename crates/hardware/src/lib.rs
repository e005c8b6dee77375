//! Cache replacement-policy engine.
//!
//! This crate models the replacement side of a set-associative cache with the following:
//! 1. **Policies:** LRU, LIP/BIP, MRU, FIFO, bit-PLRU, Random and SRRIP/BRRIP behind one trait.
//! 2. **Set dueling:** Seeded leader-set placement and a saturating PSEL counter choosing
//!    between two policies for the follower sets.
//! 3. **Cache model:** Tag array, address decoding, fills, evictions and invalidation.
//! 4. **Simulation:** Synthetic workloads, address traces, a runner, and statistics.
//!
//! # Examples
//!
//! ```
//! use duelsim_core::{CacheConfig, CacheModel, PolicyConfig};
//!
//! // 8 sets, 2 ways, 64-byte lines.
//! let config = CacheConfig::new(1024, 64, 2, PolicyConfig::Lru);
//! let mut cache = CacheModel::new(&config).unwrap();
//!
//! let stride = 8 * 64; // same set, next tag
//! for tag in [1_u64, 2, 3] {
//!     cache.access(tag * stride).unwrap();
//! }
//! assert!(!cache.contains(stride).unwrap()); // tag 1 was the LRU victim
//! ```

/// Common types (address decoding, errors).
pub mod common;
/// Engine configuration (geometry, policies, set dueling).
pub mod config;
/// Cache model, replacement policies and set dueling.
pub mod cache;
/// Workloads, traces and the simulation runner.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Main cache type; construct with `CacheModel::new`.
pub use crate::cache::{AccessOutcome, CacheModel, Eviction};
/// Configuration types; use `Config::default()` or load from JSON.
pub use crate::config::{CacheConfig, Config, DuelingConfig, PolicyConfig, PselPolarity};
/// Statistics snapshot returned by `CacheModel::stats`.
pub use crate::stats::CacheStats;
