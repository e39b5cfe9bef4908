//! Integration test utilities for the identity server
//!
//! Spawns the real router on an ephemeral port, backed by `MemoryStore`,
//! and drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
