//! Core data types for the Pea bundler.
//!
//! This module provides the fundamental types recorded in the asset graph:
//! - Environment and target descriptions
//! - Dependency descriptors produced for every import
//! - Asset groups (resolution candidates) and compiled assets

pub mod asset;
pub mod dependency;
pub mod environment;

// Re-export all public types
pub use asset::{Asset, AssetGroup, AssetOutput, AssetStats};
pub use dependency::{Dependency, NAMESPACE_SYMBOL};
pub use environment::{Environment, EnvironmentContext, OutputFormat, Target};
