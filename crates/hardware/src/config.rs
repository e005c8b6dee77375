//! Configuration system for the replacement-policy engine.
//!
//! This module defines all configuration structures and enums used to parameterize
//! a cache model. It provides:
//! 1. **Defaults:** Baseline geometry and dueling constants.
//! 2. **Structures:** Versioned root config, cache geometry, and set-dueling parameters.
//! 3. **Enums:** Replacement policy selection and PSEL polarity.
//! 4. **Validation:** Every structural constraint is checked before a cache is built.
//!
//! Configuration is supplied as JSON. Every structure rejects unknown keys, so
//! a misspelled knob is an error rather than a silently ignored option.

use std::path::Path;

use serde::Deserialize;

use crate::common::error::{ConfigError, LoadError};

/// Default configuration constants.
///
/// These values mirror the L1 configuration the policy comparisons were
/// originally run with: 32 KiB, 4-way, 64-byte lines, LRU versus LIP.
mod defaults {
    /// Configuration schema version understood by this build.
    pub const CONFIG_VERSION: u32 = 1;

    /// Default cache size in bytes (32 KiB).
    pub const CACHE_SIZE: usize = 32 * 1024;

    /// Default cache line size in bytes (64 bytes).
    pub const CACHE_LINE: usize = 64;

    /// Default cache associativity (4 ways).
    pub const CACHE_WAYS: usize = 4;

    /// Default address width in bits.
    pub const ADDR_BITS: u32 = 64;

    /// Default bimodal throttle probability for BIP and BRRIP (1/32).
    pub const BTP: f64 = 1.0 / 32.0;

    /// Default seed for every randomized policy.
    pub const SEED: u64 = 1;

    /// Default re-reference prediction value width.
    pub const RRPV_BITS: u32 = 2;

    /// Default number of sets per constituency.
    pub const CONSTITUENCY_SIZE: usize = 64;

    /// Default team size (matches the default associativity).
    pub const TEAM_SIZE: usize = 4;

    /// Default PSEL counter width.
    pub const PSEL_BITS: u32 = 10;

    /// Default cap on leader sets per team across the whole cache.
    pub const NUM_LEADER_SETS: usize = 32;

    /// Default leader sets per team within one constituency.
    pub const LEADER_SETS_PER_CONSTITUENCY: usize = 2;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use duelsim_core::config::{Config, PolicyConfig};
///
/// let json = r#"{
///     "version": 1,
///     "cache": {
///         "size_bytes": 32768,
///         "ways": 4,
///         "policy": { "dueling": { "policy_a": "lru", "policy_b": "lip" } }
///     }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.cache.num_sets(), 128);
/// assert!(matches!(config.cache.policy, PolicyConfig::Dueling(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Schema version; must equal the version this build understands.
    #[serde(default = "Config::default_version")]
    pub version: u32,
    /// Cache geometry and replacement policy.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    fn default_version() -> u32 {
        defaults::CONFIG_VERSION
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Parse` for malformed JSON or unknown keys and
    /// `LoadError::Invalid` if the described cache cannot be built.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Io` if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks the version and every cache constraint.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != defaults::CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                expected: defaults::CONFIG_VERSION,
            });
        }
        self.cache.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: defaults::CONFIG_VERSION,
            cache: CacheConfig::default(),
        }
    }
}

/// Cache geometry and replacement policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Total cache size in bytes (power of two)
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: usize,

    /// Cache line size in bytes (power of two)
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,

    /// Associativity (number of ways); must divide the number of lines
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Width of the address space; higher address bits are rejected
    #[serde(default = "CacheConfig::default_addr_bits")]
    pub addr_bits: u32,

    /// Reject accesses that are not line-aligned
    #[serde(default)]
    pub require_aligned: bool,

    /// Replacement policy
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl CacheConfig {
    /// Returns the default cache size in bytes.
    fn default_size() -> usize {
        defaults::CACHE_SIZE
    }

    /// Returns the default cache line size in bytes.
    fn default_line() -> usize {
        defaults::CACHE_LINE
    }

    /// Returns the default cache associativity (number of ways).
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Returns the default address width.
    fn default_addr_bits() -> u32 {
        defaults::ADDR_BITS
    }

    /// Creates a configuration with the given geometry and policy.
    ///
    /// The result is not validated; `CacheModel::new` does that.
    pub const fn new(size_bytes: usize, line_bytes: usize, ways: usize, policy: PolicyConfig) -> Self {
        Self {
            size_bytes,
            line_bytes,
            ways,
            addr_bits: defaults::ADDR_BITS,
            require_aligned: false,
            policy,
        }
    }

    /// Total number of lines in the cache.
    pub const fn num_lines(&self) -> usize {
        if self.line_bytes == 0 {
            0
        } else {
            self.size_bytes / self.line_bytes
        }
    }

    /// Number of sets in the cache.
    pub const fn num_sets(&self) -> usize {
        if self.ways == 0 {
            0
        } else {
            self.num_lines() / self.ways
        }
    }

    /// Checks the geometry and the policy parameters.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size_bytes == 0 {
            return Err(ConfigError::Zero { field: "size_bytes" });
        }
        if self.line_bytes == 0 {
            return Err(ConfigError::Zero { field: "line_bytes" });
        }
        if self.ways == 0 {
            return Err(ConfigError::Zero { field: "ways" });
        }
        if !self.size_bytes.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "size_bytes",
                value: self.size_bytes,
            });
        }
        if !self.line_bytes.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "line_bytes",
                value: self.line_bytes,
            });
        }
        if self.line_bytes > self.size_bytes {
            return Err(ConfigError::LineLargerThanCache {
                line_bytes: self.line_bytes,
                size_bytes: self.size_bytes,
            });
        }
        let lines = self.num_lines();
        if lines % self.ways != 0 {
            return Err(ConfigError::WaysDoNotDivideLines {
                lines,
                ways: self.ways,
            });
        }
        // size_bytes is a power of two, so its log2 is the minimum address width.
        if self.addr_bits == 0
            || self.addr_bits > 64
            || self.addr_bits < self.size_bytes.trailing_zeros()
        {
            return Err(ConfigError::AddrBits {
                addr_bits: self.addr_bits,
                size_bytes: self.size_bytes,
            });
        }
        self.policy.validate(self.num_sets(), false)
    }
}

impl Default for CacheConfig {
    /// Creates the default 32 KiB, 4-way, 64-byte-line LRU cache.
    fn default() -> Self {
        Self::new(
            defaults::CACHE_SIZE,
            defaults::CACHE_LINE,
            defaults::CACHE_WAYS,
            PolicyConfig::default(),
        )
    }
}

/// Replacement policy selection.
///
/// Unit variants are written as plain strings (`"lru"`); parameterized
/// variants as single-key objects (`{"bip": {"btp": 0.03125}}`), with every
/// parameter optional.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum PolicyConfig {
    /// Least Recently Used: insert and promote to MRU, evict LRU.
    #[default]
    Lru,
    /// LRU Insertion Policy: insert at LRU, promote to MRU on hit.
    Lip,
    /// Bimodal Insertion Policy: LIP that inserts at MRU with probability `btp`.
    Bip {
        /// Probability of inserting at the MRU position.
        #[serde(default = "PolicyConfig::default_btp")]
        btp: f64,
        /// Seed for the insertion coin.
        #[serde(default = "PolicyConfig::default_seed")]
        seed: u64,
    },
    /// Most Recently Used: evict the line touched last.
    Mru,
    /// First-In, First-Out: evict the oldest insertion, hits do not reorder.
    Fifo,
    /// Bit pseudo-LRU: one MRU bit per way.
    Plru,
    /// Uniform random victim from a seeded generator.
    Random {
        /// Generator seed.
        #[serde(default = "PolicyConfig::default_seed")]
        seed: u64,
    },
    /// Static re-reference interval prediction.
    Srrip {
        /// Width of the re-reference prediction value.
        #[serde(default = "PolicyConfig::default_rrpv_bits")]
        rrpv_bits: u32,
    },
    /// Bimodal re-reference interval prediction.
    Brrip {
        /// Width of the re-reference prediction value.
        #[serde(default = "PolicyConfig::default_rrpv_bits")]
        rrpv_bits: u32,
        /// Probability of inserting with a long (not distant) re-reference interval.
        #[serde(default = "PolicyConfig::default_btp")]
        btp: f64,
        /// Seed for the insertion coin.
        #[serde(default = "PolicyConfig::default_seed")]
        seed: u64,
    },
    /// Set dueling between two policies.
    Dueling(Box<DuelingConfig>),
}

impl PolicyConfig {
    fn default_btp() -> f64 {
        defaults::BTP
    }

    fn default_seed() -> u64 {
        defaults::SEED
    }

    fn default_rrpv_bits() -> u32 {
        defaults::RRPV_BITS
    }

    /// Set dueling between LRU and LIP with the default dueling parameters.
    pub fn lru_vs_lip() -> Self {
        Self::Dueling(Box::new(DuelingConfig::default()))
    }

    /// Policy called `name` with default parameters.
    ///
    /// Accepts every name [`PolicyConfig::name`] returns; `dueling` yields
    /// [`PolicyConfig::lru_vs_lip`].
    pub fn from_name(name: &str) -> Option<Self> {
        let policy = match name {
            "lru" => Self::Lru,
            "lip" => Self::Lip,
            "bip" => Self::Bip {
                btp: defaults::BTP,
                seed: defaults::SEED,
            },
            "mru" => Self::Mru,
            "fifo" => Self::Fifo,
            "plru" => Self::Plru,
            "random" => Self::Random {
                seed: defaults::SEED,
            },
            "srrip" => Self::Srrip {
                rrpv_bits: defaults::RRPV_BITS,
            },
            "brrip" => Self::Brrip {
                rrpv_bits: defaults::RRPV_BITS,
                btp: defaults::BTP,
                seed: defaults::SEED,
            },
            "dueling" => Self::lru_vs_lip(),
            _ => return None,
        };
        Some(policy)
    }

    /// Short lowercase name used in logs and reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Lru => "lru",
            Self::Lip => "lip",
            Self::Bip { .. } => "bip",
            Self::Mru => "mru",
            Self::Fifo => "fifo",
            Self::Plru => "plru",
            Self::Random { .. } => "random",
            Self::Srrip { .. } => "srrip",
            Self::Brrip { .. } => "brrip",
            Self::Dueling(_) => "dueling",
        }
    }

    /// Checks policy parameters against a cache of `num_sets` sets.
    ///
    /// `nested` is true while validating the contestants of a duel.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self, num_sets: usize, nested: bool) -> Result<(), ConfigError> {
        match self {
            Self::Lru | Self::Lip | Self::Mru | Self::Fifo | Self::Plru | Self::Random { .. } => {
                Ok(())
            }
            Self::Bip { btp, .. } => check_probability("btp", *btp),
            Self::Srrip { rrpv_bits } => check_rrpv_bits(*rrpv_bits),
            Self::Brrip { rrpv_bits, btp, .. } => {
                check_rrpv_bits(*rrpv_bits)?;
                check_probability("btp", *btp)
            }
            Self::Dueling(duel) => {
                if nested {
                    return Err(ConfigError::NestedDueling);
                }
                duel.validate(num_sets)
            }
        }
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

pub(crate) fn check_rrpv_bits(bits: u32) -> Result<(), ConfigError> {
    if (1..=8).contains(&bits) {
        Ok(())
    } else {
        Err(ConfigError::RrpvBits(bits))
    }
}

/// Which team's leader-set misses increment PSEL.
///
/// The opposite team's misses decrement it. Followers always resolve to the
/// team with fewer leader misses; see `DuelingSelector::winner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PselPolarity {
    /// Team B misses increment, team A misses decrement; A wins at or above the midpoint.
    #[default]
    MissBIncrements,
    /// Team A misses increment, team B misses decrement; B wins at or above the midpoint.
    MissAIncrements,
}

/// Set-dueling parameters.
///
/// Sets are grouped into constituencies of `constituency_size` consecutive
/// sets. Within each constituency a seeded shuffle picks
/// `leader_sets_per_constituency` leaders for team A and as many disjoint
/// leaders for team B; every other set follows the current PSEL winner.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DuelingConfig {
    /// Policy run by team A leaders
    #[serde(default = "DuelingConfig::default_policy_a")]
    pub policy_a: PolicyConfig,

    /// Policy run by team B leaders
    #[serde(default = "DuelingConfig::default_policy_b")]
    pub policy_b: PolicyConfig,

    /// Sets per constituency
    #[serde(default = "DuelingConfig::default_constituency_size")]
    pub constituency_size: usize,

    /// Lines forming one team; conventionally equal to the associativity
    #[serde(default = "DuelingConfig::default_team_size")]
    pub team_size: usize,

    /// Width of the saturating selection counter
    #[serde(default = "DuelingConfig::default_psel_bits")]
    pub psel_bits: u32,

    /// Cap on leader sets per team across the whole cache
    #[serde(default = "DuelingConfig::default_num_leader_sets")]
    pub num_leader_sets: usize,

    /// Leader sets per team within each constituency
    #[serde(default = "DuelingConfig::default_leader_sets_per_constituency")]
    pub leader_sets_per_constituency: usize,

    /// Seed for leader-set placement
    #[serde(default = "DuelingConfig::default_seed")]
    pub seed: u64,

    /// PSEL update polarity
    #[serde(default)]
    pub polarity: PselPolarity,
}

impl DuelingConfig {
    fn default_policy_a() -> PolicyConfig {
        PolicyConfig::Lru
    }

    fn default_policy_b() -> PolicyConfig {
        PolicyConfig::Lip
    }

    fn default_constituency_size() -> usize {
        defaults::CONSTITUENCY_SIZE
    }

    fn default_team_size() -> usize {
        defaults::TEAM_SIZE
    }

    fn default_psel_bits() -> u32 {
        defaults::PSEL_BITS
    }

    fn default_num_leader_sets() -> usize {
        defaults::NUM_LEADER_SETS
    }

    fn default_leader_sets_per_constituency() -> usize {
        defaults::LEADER_SETS_PER_CONSTITUENCY
    }

    fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Checks the dueling parameters against a cache of `num_sets` sets.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self, num_sets: usize) -> Result<(), ConfigError> {
        self.policy_a.validate(num_sets, true)?;
        self.policy_b.validate(num_sets, true)?;
        if self.psel_bits == 0 || self.psel_bits > 16 {
            return Err(ConfigError::PselBits(self.psel_bits));
        }
        if self.team_size == 0 {
            return Err(ConfigError::Zero { field: "team_size" });
        }
        if self.num_leader_sets == 0 {
            return Err(ConfigError::Zero {
                field: "num_leader_sets",
            });
        }
        if self.leader_sets_per_constituency == 0 {
            return Err(ConfigError::Zero {
                field: "leader_sets_per_constituency",
            });
        }
        if self.constituency_size == 0 {
            return Err(ConfigError::Zero {
                field: "constituency_size",
            });
        }
        // Saturates so a count near `usize::MAX` still fails the fit check.
        let needed = self.leader_sets_per_constituency.saturating_mul(2);
        if needed > self.constituency_size {
            return Err(ConfigError::LeadersDoNotFit {
                per_team: self.leader_sets_per_constituency,
                needed,
                constituency_size: self.constituency_size,
            });
        }
        if self.constituency_size > num_sets {
            return Err(ConfigError::ConstituencyTooLarge {
                constituency_size: self.constituency_size,
                num_sets,
            });
        }
        if num_sets % self.constituency_size != 0 {
            return Err(ConfigError::ConstituencyDoesNotDivide {
                constituency_size: self.constituency_size,
                num_sets,
            });
        }
        Ok(())
    }
}

impl Default for DuelingConfig {
    /// LRU (team A) against LIP (team B) with 64-set constituencies, two
    /// leaders per team per constituency, a 10-bit PSEL and seed 1.
    fn default() -> Self {
        Self {
            policy_a: PolicyConfig::Lru,
            policy_b: PolicyConfig::Lip,
            constituency_size: defaults::CONSTITUENCY_SIZE,
            team_size: defaults::TEAM_SIZE,
            psel_bits: defaults::PSEL_BITS,
            num_leader_sets: defaults::NUM_LEADER_SETS,
            leader_sets_per_constituency: defaults::LEADER_SETS_PER_CONSTITUENCY,
            seed: defaults::SEED,
            polarity: PselPolarity::default(),
        }
    }
}
