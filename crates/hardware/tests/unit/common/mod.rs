//! Tests for common types.
