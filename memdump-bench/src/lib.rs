//! # memdump bench
//!
//! Fixtures and measurement utilities for decoder performance testing.

pub mod fixtures;
pub mod latency;
pub mod throughput;
