//! Simulation utilities.
//!
//! Provides synthetic workloads, address-trace loading and a runner that
//! feeds either through a cache model phase by phase.

/// Address trace reader.
pub mod trace;

/// Phase-aware simulation runner.
pub mod simulator;

/// Synthetic benchmark workloads.
pub mod workload;

pub use simulator::{PhaseSummary, RunSummary, Simulator};
pub use workload::{PRESETS, Workload};
