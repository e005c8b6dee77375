//! # Unit Components
//!
//! This module is the central hub for the engine's unit tests, organized by
//! subsystem: address decoding, configuration, the cache model and its
//! policies, statistics, and the simulation driver.

/// Unit tests for address decoding and error reporting.
pub mod common;



/// Workloads, traces and the simulation runner.
pub mod sim;

/// Statistics accounting and reporting.
pub mod stats;
