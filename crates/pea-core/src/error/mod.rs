//! Error types and result aliases for Pea operations.
//!
//! Provides a unified error type that covers configuration loading and the
//! structural contract of the asset graph, with actionable error messages.

use thiserror::Error;

/// Unified error type for all Pea operations
#[derive(Error, Debug)]
pub enum PeaError {
    // Config errors
    #[error("Failed to parse pea.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Graph errors
    #[error("Invalid graph configuration: {message}")]
    Configuration { message: String },

    #[error("Unknown graph node: {id}")]
    UnknownNode { id: String },

    #[error("Invariant violated at node {id}: expected {expected} node, found {found}")]
    InvariantViolation {
        id: String,
        expected: &'static str,
        found: &'static str,
    },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Pea operations
pub type PeaResult<T> = Result<T, PeaError>;

impl PeaError {
    /// Create a configuration error for invalid graph initialization input
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown node error
    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PeaError::Io { .. })
    }

    /// Whether this error signals a broken graph contract.
    ///
    /// Fatal errors indicate a logic bug in the caller and must abort the
    /// current mutation instead of being retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PeaError::UnknownNode { .. } | PeaError::InvariantViolation { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            PeaError::Configuration { .. } => {
                Some("Declare at least one [[bundle.targets]] entry when listing entries")
            },
            PeaError::TomlParse { .. } => Some("Check the syntax of pea.toml near the reported line"),
            PeaError::ConfigValidation { .. } => {
                Some("Fix the reported field in the [bundle] section of pea.toml")
            },
            PeaError::UnknownNode { .. } | PeaError::InvariantViolation { .. } => {
                Some("This is a bug in the build orchestrator, please report it")
            },
            _ => None,
        }
    }
}
