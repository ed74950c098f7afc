//! Utility functions and helpers.
//!
//! Common functionality used across multiple Pea crates.

pub mod hash;
pub mod path;

// Re-export commonly used utilities
pub use hash::{blake3_hash, content_id, ContentHasher};
pub use path::{get_extension, normalize_path};
