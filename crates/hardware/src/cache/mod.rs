//! Set-Associative Cache Model.
//!
//! This module implements the tag array and the replacement machinery around
//! it. It supports every policy in [`policies`] and set dueling between any
//! two of them through [`dueling`]. An access decodes the address, scans the
//! set, and on a miss fills a free way or evicts the victim the set's active
//! policy chooses.
//!
//! The model is single-threaded and order-sensitive: recency metadata and
//! PSEL depend on the exact access order. Independent models (e.g. an
//! instruction and a data cache) share nothing and may run on separate threads.

/// Set dueling: leader-set assignment and PSEL.
pub mod dueling;

/// Cache replacement policy implementations.
pub mod policies;

/// Cache sets and lines.
pub mod set;

use self::dueling::{DuelingSelector, SetRole, Team};
use self::policies::ReplacementPolicy;
use self::set::CacheSet;
use crate::common::addr::{AddressMap, Decoded};
use crate::common::error::{AccessError, ConfigError};
use crate::config::{CacheConfig, PolicyConfig};
use crate::stats::CacheStats;

/// A line pushed out to make room for a fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eviction {
    /// Tag of the evicted line.
    pub tag: u64,
    /// Line-aligned byte address of the evicted line.
    pub addr: u64,
}

/// Result of a serviced access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The line was resident.
    Hit {
        /// Set index.
        set: usize,
        /// Way holding the line.
        way: usize,
    },
    /// The line was filled.
    Miss {
        /// Set index.
        set: usize,
        /// Way the line was placed in.
        way: usize,
        /// Line evicted to make room, if the set was full.
        evicted: Option<Eviction>,
    },
}

impl AccessOutcome {
    /// True for a hit.
    #[inline]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Set the access mapped to.
    #[inline]
    pub const fn set(&self) -> usize {
        match *self {
            Self::Hit { set, .. } | Self::Miss { set, .. } => set,
        }
    }

    /// Way that now holds the accessed line.
    #[inline]
    pub const fn way(&self) -> usize {
        match *self {
            Self::Hit { way, .. } | Self::Miss { way, .. } => way,
        }
    }

    /// Evicted line, if this was a miss into a full set.
    #[inline]
    pub const fn evicted(&self) -> Option<Eviction> {
        match *self {
            Self::Hit { .. } => None,
            Self::Miss { evicted, .. } => evicted,
        }
    }
}

/// The policy (or pair of policies) driving replacement.
#[derive(Debug)]
enum PolicyEngine {
    Single(Box<dyn ReplacementPolicy>),
    Dueling {
        a: Box<dyn ReplacementPolicy>,
        b: Box<dyn ReplacementPolicy>,
        selector: DuelingSelector,
    },
}

impl PolicyEngine {
    fn new(config: &PolicyConfig, sets: usize, ways: usize) -> Result<Self, ConfigError> {
        match config {
            PolicyConfig::Dueling(duel) => Ok(Self::Dueling {
                a: policies::build(&duel.policy_a, sets, ways)?,
                b: policies::build(&duel.policy_b, sets, ways)?,
                selector: DuelingSelector::new(sets, duel)?,
            }),
            single => Ok(Self::Single(policies::build(single, sets, ways)?)),
        }
    }

    // Both contestants observe every access so either can take over a
    // follower set with warm metadata.
    fn on_access(&mut self, set: usize, way: usize) {
        match self {
            Self::Single(p) => p.on_access(set, way),
            Self::Dueling { a, b, .. } => {
                a.on_access(set, way);
                b.on_access(set, way);
            }
        }
    }

    fn on_insert(&mut self, set: usize, way: usize) {
        match self {
            Self::Single(p) => p.on_insert(set, way),
            Self::Dueling { a, b, .. } => {
                a.on_insert(set, way);
                b.on_insert(set, way);
            }
        }
    }

    fn on_invalidate(&mut self, set: usize, way: usize) {
        match self {
            Self::Single(p) => p.on_invalidate(set, way),
            Self::Dueling { a, b, .. } => {
                a.on_invalidate(set, way);
                b.on_invalidate(set, way);
            }
        }
    }

    fn select_victim(&mut self, set: usize) -> usize {
        match self {
            Self::Single(p) => p.select_victim(set),
            // `set` comes from a decoded address and is always in range.
            Self::Dueling { a, b, selector } => match selector.resolve(set) {
                Some(Team::A) | None => a.select_victim(set),
                Some(Team::B) => b.select_victim(set),
            },
        }
    }

    fn record_access(&mut self, set: usize) {
        if let Self::Dueling { selector, .. } = self {
            selector.record_access(set);
        }
    }

    fn record_miss(&mut self, set: usize) {
        if let Self::Dueling { selector, .. } = self {
            selector.record_miss(set);
        }
    }

    fn selector(&self) -> Option<&DuelingSelector> {
        match self {
            Self::Single(_) => None,
            Self::Dueling { selector, .. } => Some(selector),
        }
    }

    fn name(&self) -> String {
        match self {
            Self::Single(p) => p.name().to_owned(),
            Self::Dueling { a, b, .. } => format!("dueling({}|{})", a.name(), b.name()),
        }
    }
}

/// Cache model: `num_sets` sets of `ways` lines plus the replacement engine.
///
/// Built once from a [`CacheConfig`]; the geometry never changes afterwards.
#[derive(Debug)]
pub struct CacheModel {
    sets: Vec<CacheSet>,
    map: AddressMap,
    ways: usize,
    line_bytes: usize,
    engine: PolicyEngine,
    stats: CacheStats,
}

impl CacheModel {
    /// Creates a cache model with the specified configuration.
    ///
    /// # Errors
    ///
    /// Returns the first configuration constraint violated. Nothing is
    /// clamped: an impossible geometry or duel is rejected here, before any
    /// access is processed.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let num_sets = config.num_sets();
        let engine = PolicyEngine::new(&config.policy, num_sets, config.ways)?;

        if let PolicyConfig::Dueling(duel) = &config.policy {
            if duel.team_size != config.ways {
                tracing::warn!(
                    team_size = duel.team_size,
                    ways = config.ways,
                    "dueling team size differs from associativity"
                );
            }
        }

        tracing::debug!(
            size_bytes = config.size_bytes,
            line_bytes = config.line_bytes,
            ways = config.ways,
            num_sets,
            policy = %engine.name(),
            "cache model created"
        );

        Ok(Self {
            sets: (0..num_sets).map(|i| CacheSet::new(i, config.ways)).collect(),
            map: AddressMap::new(
                config.line_bytes,
                num_sets,
                config.addr_bits,
                config.require_aligned,
            ),
            ways: config.ways,
            line_bytes: config.line_bytes,
            engine,
            stats: CacheStats::default(),
        })
    }

    /// Accesses the cache for the specified address.
    ///
    /// On a hit the active policy is told the line was used. On a miss the
    /// line is placed in the lowest free way, or in the victim chosen by the
    /// set's active policy when the set is full; the miss is then scored for
    /// set dueling.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::AddressOutOfRange` / `AccessError::Misaligned`
    /// for addresses that cannot be decoded (no state changes), and
    /// `AccessError::InvalidVictim` if the policy breaks its contract.
    pub fn access(&mut self, addr: u64) -> Result<AccessOutcome, AccessError> {
        let Decoded { set, tag, .. } = self.map.decode(addr)?;
        let cache_set = &mut self.sets[set];

        if let Some(way) = cache_set.find(tag) {
            self.engine.record_access(set);
            self.engine.on_access(set, way);
            self.stats.accesses += 1;
            self.stats.hits += 1;
            return Ok(AccessOutcome::Hit { set, way });
        }

        let (way, evicted) = if let Some(way) = cache_set.free_way() {
            (way, None)
        } else {
            let engine = &mut self.engine;
            let way = cache_set.choose_victim(|s| engine.select_victim(s))?;
            let tag = cache_set.lines()[way].tag;
            let addr = self.map.line_address(tag, set);
            tracing::trace!(set, way, evicted_addr = addr, "evict");
            (way, Some(Eviction { tag, addr }))
        };

        let _ = cache_set.fill(way, tag);
        self.engine.record_access(set);
        self.engine.on_insert(set, way);
        self.engine.record_miss(set);

        self.stats.accesses += 1;
        self.stats.misses += 1;
        if evicted.is_some() {
            self.stats.evictions += 1;
        } else {
            self.stats.compulsory_misses += 1;
        }
        Ok(AccessOutcome::Miss { set, way, evicted })
    }

    /// Checks if the cache holds the line containing `addr`, without touching any state.
    ///
    /// # Errors
    ///
    /// Returns an `AccessError` if the address cannot be decoded.
    pub fn contains(&self, addr: u64) -> Result<bool, AccessError> {
        let Decoded { set, tag, .. } = self.map.decode(addr)?;
        Ok(self.sets[set].find(tag).is_some())
    }

    /// Invalidates the line containing `addr`, if resident.
    ///
    /// Returns whether a line was removed. Invalidation does not score PSEL.
    ///
    /// # Errors
    ///
    /// Returns an `AccessError` if the address cannot be decoded.
    pub fn invalidate(&mut self, addr: u64) -> Result<bool, AccessError> {
        let Decoded { set, tag, .. } = self.map.decode(addr)?;
        let Some(way) = self.sets[set].find(tag) else {
            return Ok(false);
        };
        let _ = self.sets[set].invalidate(way);
        self.engine.on_invalidate(set, way);
        self.stats.invalidations += 1;
        Ok(true)
    }

    /// Invalidates every valid line.
    ///
    /// PSEL and leader assignments are kept.
    pub fn flush(&mut self) {
        for cache_set in &mut self.sets {
            let set = cache_set.index();
            for way in 0..self.ways {
                if cache_set.invalidate(way).is_some() {
                    self.engine.on_invalidate(set, way);
                    self.stats.invalidations += 1;
                }
            }
        }
    }

    /// Snapshot of the statistics, including duel counters when dueling.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            dueling: self.engine.selector().map(DuelingSelector::stats),
            ..self.stats.clone()
        }
    }

    /// Clears all counters. Cache contents, policy metadata and PSEL are kept.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
        if let PolicyEngine::Dueling { selector, .. } = &mut self.engine {
            selector.reset_stats();
        }
    }

    /// Set-dueling selector, when the cache duels two policies.
    pub fn selector(&self) -> Option<&DuelingSelector> {
        self.engine.selector()
    }

    /// Team whose policy `set` runs right now, when dueling.
    ///
    /// `None` for a non-dueling cache or a set index past `num_sets`.
    pub fn team_for_set(&self, set: usize) -> Option<Team> {
        self.engine.selector().and_then(|s| s.resolve(set))
    }

    /// Static dueling role of `set`, when dueling.
    ///
    /// `None` for a non-dueling cache or a set index past `num_sets`.
    pub fn role_of_set(&self, set: usize) -> Option<SetRole> {
        self.engine.selector().and_then(|s| s.policy_for_set(set))
    }

    /// Human-readable policy name, e.g. `lru` or `dueling(lru|lip)`.
    pub fn policy_name(&self) -> String {
        self.engine.name()
    }

    /// Set `index`, if in range.
    pub fn set(&self, index: usize) -> Option<&CacheSet> {
        self.sets.get(index)
    }

    /// Address decoder for this geometry.
    pub const fn address_map(&self) -> &AddressMap {
        &self.map
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> usize {
        self.line_bytes
    }
}
