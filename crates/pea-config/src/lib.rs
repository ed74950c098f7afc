//! Bundle configuration parsing for Pea
//!
//! This crate handles parsing and validation of the `[bundle]` section of
//! pea.toml: the entries, the targets they are built for, and the asset graph
//! options.

pub mod toml;

// Re-export main types
pub use self::toml::{
    load_from_file, parse_bundle_toml, validate_bundle, BundleSection, PeaToml, TargetSpec,
};

use pea_core::error::PeaError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, PeaError>;
