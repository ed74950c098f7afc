//! # pea-core
//!
//! Core types and utilities shared across all Pea crates.
//!
//! This crate provides:
//! - The bundler data model: environments, targets, dependencies, asset groups and assets
//! - PeaError enum for unified error handling
//! - Content hashing and path helpers used to derive stable identifiers
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Dependency, AssetGroup, Asset, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{PeaError, PeaResult};
pub use types::{
    Asset, AssetGroup, AssetOutput, AssetStats, Dependency, Environment, EnvironmentContext,
    OutputFormat, Target, NAMESPACE_SYMBOL,
};
