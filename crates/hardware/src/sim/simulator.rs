//! Simulator: drives an address stream through one cache model.
//!
//! Runs are split into phases so the PSEL trajectory of a dueling cache can
//! be followed across changes in workload behaviour.

use serde::Serialize;

use super::workload::Workload;
use crate::cache::CacheModel;
use crate::cache::dueling::Team;
use crate::common::error::{AccessError, ConfigError};
use crate::config::CacheConfig;
use crate::stats::CacheStats;

/// Outcome of one phase of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSummary {
    /// Phase label.
    pub name: String,
    /// Accesses in this phase.
    pub accesses: u64,
    /// Hits in this phase.
    pub hits: u64,
    /// Misses in this phase.
    pub misses: u64,
    /// Misses divided by accesses, or 0 for an empty phase.
    pub miss_rate: f64,
    /// PSEL at the end of the phase, when dueling.
    pub psel: Option<u32>,
    /// Follower team at the end of the phase, when dueling.
    pub winner: Option<Team>,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Policy name as reported by the cache model.
    pub policy: String,
    /// Per-phase results, in order.
    pub phases: Vec<PhaseSummary>,
    /// Cumulative statistics at the end of the run.
    pub stats: CacheStats,
}

/// Top-level simulator: a cache model and the phases it has run.
#[derive(Debug)]
pub struct Simulator {
    /// Cache under test.
    pub cache: CacheModel,
    phases: Vec<PhaseSummary>,
}

impl Simulator {
    /// Creates a simulator around a fresh cache.
    ///
    /// # Errors
    ///
    /// Returns the configuration error `CacheModel::new` reports.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            cache: CacheModel::new(config)?,
            phases: Vec::new(),
        })
    }

    /// Runs `addrs` as one named phase and records its summary.
    ///
    /// # Errors
    ///
    /// Stops at the first address the cache rejects; accesses already made
    /// stay applied but the phase is not recorded.
    pub fn run_phase(
        &mut self,
        name: &str,
        addrs: impl IntoIterator<Item = u64>,
    ) -> Result<&PhaseSummary, AccessError> {
        let before = self.cache.stats();
        for addr in addrs {
            let _ = self.cache.access(addr)?;
        }
        let after = self.cache.stats();

        let accesses = after.accesses - before.accesses;
        let misses = after.misses - before.misses;
        let selector = self.cache.selector();
        let summary = PhaseSummary {
            name: name.to_owned(),
            accesses,
            hits: after.hits - before.hits,
            misses,
            miss_rate: if accesses == 0 {
                0.0
            } else {
                misses as f64 / accesses as f64
            },
            psel: selector.map(|s| s.psel().value()),
            winner: selector.map(|s| s.winner()),
        };
        tracing::info!(
            phase = name,
            accesses,
            misses,
            psel = ?summary.psel,
            winner = ?summary.winner,
            "phase complete"
        );
        self.phases.push(summary);
        Ok(&self.phases[self.phases.len() - 1])
    }

    /// Runs every phase of `workload`.
    ///
    /// # Errors
    ///
    /// See [`Simulator::run_phase`].
    pub fn run_workload(&mut self, workload: Workload) -> Result<RunSummary, AccessError> {
        for (name, stream) in workload.phases() {
            let _ = self.run_phase(&name, stream)?;
        }
        Ok(self.summary())
    }

    /// Runs a flat address list (e.g. a trace) as a single phase.
    ///
    /// # Errors
    ///
    /// See [`Simulator::run_phase`].
    pub fn run_trace(&mut self, addrs: &[u64]) -> Result<RunSummary, AccessError> {
        let _ = self.run_phase("trace", addrs.iter().copied())?;
        Ok(self.summary())
    }

    /// Summary of every phase run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            policy: self.cache.policy_name(),
            phases: self.phases.clone(),
            stats: self.cache.stats(),
        }
    }
}
