//! Pea benchmarking suite
//!
//! Criterion benchmarks for asset graph construction, incremental rebuilds
//! and post-build queries.

pub mod common;

pub use common::*;
