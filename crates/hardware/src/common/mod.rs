//! Common types shared across the engine.
//!
//! This module provides the building blocks every other module leans on:
//! 1. **Address Decoding:** Splitting byte addresses into set, tag and offset.
//! 2. **Error Handling:** Configuration, load, access and trace error types.

/// Address decomposition (set index, tag, offset).
pub mod addr;

/// Error types.
pub mod error;

pub use addr::{AddressMap, Decoded};
pub use error::{AccessError, ConfigError, LoadError, TraceError};
