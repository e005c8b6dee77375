//! Error definitions.
//!
//! This module defines every failure the engine can report. It provides:
//! 1. **Configuration Errors:** Geometry and dueling parameters rejected at construction time.
//! 2. **Load Errors:** I/O and JSON failures while reading a configuration file.
//! 3. **Access Errors:** Undecodable addresses and replacement-contract violations.
//! 4. **Trace Errors:** Malformed address traces handed to the simulation driver.

use thiserror::Error;

/// A rejected configuration.
///
/// Raised by `Config::validate` and by every constructor that accepts
/// configuration. Values are never clamped into range; the first violation
/// found is reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The configuration was written for a schema version this build does not understand.
    #[error("unsupported configuration version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Version this build accepts.
        expected: u32,
    },

    /// A size or count that must be positive was zero.
    #[error("`{field}` must be non-zero")]
    Zero {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A size that must be a power of two was not.
    #[error("`{field}` must be a power of two (got {value})")]
    NotPowerOfTwo {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied.
        value: usize,
    },

    /// The line size exceeds the total cache size.
    #[error("line size {line_bytes} exceeds cache size {size_bytes}")]
    LineLargerThanCache {
        /// Configured line size in bytes.
        line_bytes: usize,
        /// Configured cache size in bytes.
        size_bytes: usize,
    },

    /// The associativity does not evenly divide the number of lines.
    #[error("associativity {ways} does not divide {lines} lines")]
    WaysDoNotDivideLines {
        /// Total number of lines in the cache.
        lines: usize,
        /// Configured associativity.
        ways: usize,
    },

    /// The address width is outside 1..=64 or too narrow to cover the cache.
    #[error("address width {addr_bits} bits cannot address a {size_bytes}-byte cache (valid range 1..=64)")]
    AddrBits {
        /// Configured address width.
        addr_bits: u32,
        /// Configured cache size in bytes.
        size_bytes: usize,
    },

    /// The PSEL counter width is outside 1..=16.
    #[error("psel_bits must be in 1..=16 (got {0})")]
    PselBits(u32),

    /// The RRPV width is outside 1..=8.
    #[error("rrpv_bits must be in 1..=8 (got {0})")]
    RrpvBits(u32),

    /// A probability knob is outside [0, 1].
    #[error("`{field}` must be a probability in [0, 1] (got {value})")]
    Probability {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied.
        value: f64,
    },

    /// Leader sets for both teams do not fit inside one constituency.
    #[error(
        "{per_team} leader sets per team need {needed} sets but a constituency holds {constituency_size}"
    )]
    LeadersDoNotFit {
        /// Leader sets per team per constituency.
        per_team: usize,
        /// Sets required for both teams.
        needed: usize,
        /// Configured constituency size.
        constituency_size: usize,
    },

    /// The constituency is larger than the cache.
    #[error("constituency size {constituency_size} exceeds the {num_sets} sets in the cache")]
    ConstituencyTooLarge {
        /// Configured constituency size.
        constituency_size: usize,
        /// Number of sets in the cache.
        num_sets: usize,
    },

    /// The set count is not a whole number of constituencies.
    #[error("constituency size {constituency_size} does not divide {num_sets} sets")]
    ConstituencyDoesNotDivide {
        /// Configured constituency size.
        constituency_size: usize,
        /// Number of sets in the cache.
        num_sets: usize,
    },

    /// A dueling policy was configured as one of the contestants of another duel.
    #[error("dueling policies cannot be nested")]
    NestedDueling,
}

/// Failure while loading a configuration document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON, names an unknown option, or has a wrongly typed value.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but describes an impossible cache.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Failure while servicing a single access.
///
/// Distinct from a miss: an `AccessError` means the access was not performed
/// and no cache state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The address has bits set above the configured address width.
    #[error("address {addr:#x} is outside the {addr_bits}-bit address space")]
    AddressOutOfRange {
        /// Address supplied.
        addr: u64,
        /// Configured address width.
        addr_bits: u32,
    },

    /// The address is not line-aligned and the cache requires aligned accesses.
    #[error("address {addr:#x} is not aligned to the {line_bytes}-byte line size")]
    Misaligned {
        /// Address supplied.
        addr: u64,
        /// Configured line size.
        line_bytes: usize,
    },

    /// A victim was requested from a set holding no valid line.
    #[error("victim requested from set {set}, which holds no valid line")]
    NoValidLine {
        /// Set index.
        set: usize,
    },

    /// The replacement policy named a way that is out of range or not valid.
    #[error("replacement policy chose way {way} of set {set}, which is not a valid line")]
    InvalidVictim {
        /// Set index.
        set: usize,
        /// Way returned by the policy.
        way: usize,
    },
}

/// Failure while reading an address trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    /// A line is neither blank, a comment, nor an address.
    #[error("line {line}: cannot parse `{text}` as an address")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Offending text, trimmed.
        text: String,
    },
}
