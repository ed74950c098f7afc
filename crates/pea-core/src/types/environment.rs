//! Environment and target descriptions.
//!
//! An environment captures the platform and output constraints an asset is
//! compiled for. A target pairs an environment with an output destination.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime context code is built for
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentContext {
    #[default]
    Browser,
    WebWorker,
    ServiceWorker,
    Node,
    ElectronMain,
    ElectronRenderer,
}

/// Module format of the emitted code
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Global,
    Commonjs,
    Esmodule,
}

/// Platform and output constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Environment {
    pub context: EnvironmentContext,
    /// Engine name to version range, e.g. `node = ">= 18"`
    pub engines: BTreeMap<String, String>,
    pub output_format: OutputFormat,
    pub is_library: bool,
}

/// Output configuration an entry is built for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub dist_dir: Utf8PathBuf,
    pub env: Environment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

impl Environment {
    /// Create an environment for the given context with its usual output format
    pub fn new(context: EnvironmentContext) -> Self {
        let output_format = match context {
            EnvironmentContext::Node | EnvironmentContext::ElectronMain => OutputFormat::Commonjs,
            _ => OutputFormat::Global,
        };
        Self {
            context,
            engines: BTreeMap::new(),
            output_format,
            is_library: false,
        }
    }

    pub fn browser() -> Self {
        Self::new(EnvironmentContext::Browser)
    }

    pub fn node() -> Self {
        Self::new(EnvironmentContext::Node)
    }

    /// Add an engine constraint
    pub fn with_engine(mut self, engine: impl Into<String>, range: impl Into<String>) -> Self {
        self.engines.insert(engine.into(), range.into());
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    /// Mark the environment as a library build
    pub fn library(mut self) -> Self {
        self.is_library = true;
        self
    }

    pub fn is_browser(&self) -> bool {
        matches!(
            self.context,
            EnvironmentContext::Browser
                | EnvironmentContext::WebWorker
                | EnvironmentContext::ServiceWorker
                | EnvironmentContext::ElectronRenderer
        )
    }

    pub fn is_node(&self) -> bool {
        matches!(
            self.context,
            EnvironmentContext::Node
                | EnvironmentContext::ElectronMain
                | EnvironmentContext::ElectronRenderer
        )
    }
}

impl Target {
    /// Create a new target
    pub fn new(name: impl Into<String>, dist_dir: impl Into<Utf8PathBuf>, env: Environment) -> Self {
        Self {
            name: name.into(),
            dist_dir: dist_dir.into(),
            env,
            public_url: None,
        }
    }

    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = Some(public_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults() {
        let node = Environment::node();
        assert_eq!(node.output_format, OutputFormat::Commonjs);
        assert!(node.is_node());
        assert!(!node.is_browser());

        let browser = Environment::browser();
        assert_eq!(browser.output_format, OutputFormat::Global);
        assert!(browser.is_browser());
    }

    #[test]
    fn test_electron_renderer_is_both() {
        let env = Environment::new(EnvironmentContext::ElectronRenderer);
        assert!(env.is_browser());
        assert!(env.is_node());
    }

    #[test]
    fn test_context_serde_names() {
        let json = serde_json::to_string(&EnvironmentContext::ElectronMain).unwrap();
        assert_eq!(json, "\"electron-main\"");

        let format: OutputFormat = serde_json::from_str("\"esmodule\"").unwrap();
        assert_eq!(format, OutputFormat::Esmodule);
    }

    #[test]
    fn test_target_creation() {
        let target = Target::new("modern", "dist/modern", Environment::browser())
            .with_public_url("/static");
        assert_eq!(target.dist_dir.as_str(), "dist/modern");
        assert_eq!(target.public_url.as_deref(), Some("/static"));
    }
}
