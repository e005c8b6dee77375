//! `TestCache`: a cache model addressed by `(tag, set)`.

use duelsim_core::cache::AccessOutcome;
use duelsim_core::config::{CacheConfig, DuelingConfig, PolicyConfig};
use duelsim_core::CacheModel;

/// A cache under test plus the geometry needed to build addresses.
pub struct TestCache {
    /// Cache under test.
    pub cache: CacheModel,
    num_sets: u64,
    line_bytes: u64,
}

impl TestCache {
    /// Builds a cache of `size_bytes` bytes with the given line size, associativity and policy.
    pub fn new(size_bytes: usize, line_bytes: usize, ways: usize, policy: PolicyConfig) -> Self {
        Self::with_config(&CacheConfig::new(size_bytes, line_bytes, ways, policy))
    }

    /// Builds a cache from a full configuration.
    pub fn with_config(config: &CacheConfig) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let cache = CacheModel::new(config).unwrap_or_else(|e| panic!("invalid test config: {e}"));
        Self {
            num_sets: cache.num_sets() as u64,
            line_bytes: cache.line_bytes() as u64,
            cache,
        }
    }

    /// Line-aligned address of `tag` in `set`.
    pub fn addr(&self, tag: u64, set: usize) -> u64 {
        (tag * self.num_sets + set as u64) * self.line_bytes
    }

    /// Accesses `tag` in `set`.
    pub fn touch(&mut self, tag: u64, set: usize) -> AccessOutcome {
        let addr = self.addr(tag, set);
        self.cache
            .access(addr)
            .unwrap_or_else(|e| panic!("access {addr:#x}: {e}"))
    }

    /// Accesses `tag` in every set, in ascending set order.
    pub fn sweep(&mut self, tag: u64) {
        for set in 0..self.num_sets as usize {
            let _ = self.touch(tag, set);
        }
    }

    /// Whether `tag` is resident in `set`.
    pub fn holds(&self, tag: u64, set: usize) -> bool {
        self.cache
            .contains(self.addr(tag, set))
            .unwrap_or_else(|e| panic!("contains: {e}"))
    }
}

/// Dueling configuration with one leader-set layout knob per argument and defaults elsewhere.
pub fn dueling(
    policy_a: PolicyConfig,
    policy_b: PolicyConfig,
    constituency_size: usize,
    psel_bits: u32,
) -> PolicyConfig {
    PolicyConfig::Dueling(Box::new(DuelingConfig {
        policy_a,
        policy_b,
        constituency_size,
        psel_bits,
        ..DuelingConfig::default()
    }))
}
