//! pea.toml `[bundle]` section parsing and validation

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use camino::{Utf8Path, Utf8PathBuf};
use pea_core::error::PeaError;
use pea_core::types::{Environment, EnvironmentContext, OutputFormat, Target};
use serde::{Deserialize, Serialize};

use crate::ConfigResult;

/// Default number of assets listed in graph reports
pub const DEFAULT_LARGEST_ASSET_COUNT: usize = 100;

/// The parts of pea.toml the bundler reads; other sections are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeaToml {
    /// Bundle section
    #[serde(default)]
    pub bundle: BundleSection,
}

/// `[bundle]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BundleSection {
    /// Entry module specifiers
    #[serde(default)]
    pub entries: Vec<String>,

    /// Output targets, every entry is built for each of them
    #[serde(default)]
    pub targets: Vec<TargetSpec>,

    /// Skip transforming side-effect free re-exports nobody uses
    #[serde(default = "default_true")]
    pub defer_weak_dependencies: bool,

    /// Number of assets listed by the graph report
    #[serde(default = "default_largest_asset_count")]
    pub largest_asset_count: usize,
}

/// `[[bundle.targets]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetSpec {
    /// Target name (required, unique)
    pub name: String,

    /// Output directory
    pub dist_dir: Utf8PathBuf,

    /// Runtime context
    #[serde(default)]
    pub context: EnvironmentContext,

    /// Output format, defaults to the usual format of the context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,

    /// Engine constraints
    #[serde(default)]
    pub engines: BTreeMap<String, String>,

    /// Library build
    #[serde(default)]
    pub is_library: bool,

    /// Public URL the bundles are served from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_largest_asset_count() -> usize {
    DEFAULT_LARGEST_ASSET_COUNT
}

impl Default for BundleSection {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            targets: Vec::new(),
            defer_weak_dependencies: true,
            largest_asset_count: DEFAULT_LARGEST_ASSET_COUNT,
        }
    }
}

impl TargetSpec {
    /// Build the environment described by this target
    pub fn environment(&self) -> Environment {
        let mut env = Environment::new(self.context);
        if let Some(output_format) = self.output_format {
            env.output_format = output_format;
        }
        env.engines = self.engines.clone();
        env.is_library = self.is_library;
        env
    }

    /// Convert to the core target type
    pub fn to_target(&self) -> Target {
        let target = Target::new(self.name.clone(), self.dist_dir.clone(), self.environment());
        match &self.public_url {
            Some(url) => target.with_public_url(url.clone()),
            None => target,
        }
    }
}

impl BundleSection {
    /// All configured targets as core targets
    pub fn targets(&self) -> Vec<Target> {
        self.targets.iter().map(TargetSpec::to_target).collect()
    }
}

/// Parse pea.toml content and return its validated `[bundle]` section
pub fn parse_bundle_toml(content: &str) -> ConfigResult<BundleSection> {
    // First try with toml_edit for better error reporting
    if let Err(e) = content.parse::<toml_edit::DocumentMut>() {
        return Err(toml_error(content, e.message(), e.span()));
    }

    // Then parse with serde for type safety
    let config: PeaToml =
        ::toml::from_str(content).map_err(|e| toml_error(content, e.message(), e.span()))?;

    validate_bundle(&config.bundle)?;

    Ok(config.bundle)
}

/// Validate the bundle section
pub fn validate_bundle(bundle: &BundleSection) -> ConfigResult<()> {
    if let Some(index) = bundle.entries.iter().position(|entry| entry.trim().is_empty()) {
        return Err(invalid(format!("bundle.entries[{}]", index), "entry must not be empty"));
    }

    if !bundle.entries.is_empty() && bundle.targets.is_empty() {
        return Err(invalid(
            "bundle.targets",
            "at least one target is required when entries are specified",
        ));
    }

    let mut names = HashSet::new();
    for (index, target) in bundle.targets.iter().enumerate() {
        if target.name.trim().is_empty() {
            return Err(invalid(format!("bundle.targets[{}].name", index), "name must not be empty"));
        }
        if !names.insert(target.name.as_str()) {
            return Err(invalid(
                format!("bundle.targets[{}].name", index),
                format!("duplicate target name '{}'", target.name),
            ));
        }
        if target.dist_dir.as_str().is_empty() {
            return Err(invalid(
                format!("bundle.targets[{}].dist-dir", index),
                "dist-dir must not be empty",
            ));
        }
    }

    Ok(())
}

/// Load and parse the `[bundle]` section of a pea.toml file
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<BundleSection> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PeaError::io(format!("Failed to read {}", path), e))?;

    parse_bundle_toml(&content).map_err(|e| match e {
        PeaError::TomlParse {
            message,
            line,
            column,
        } => PeaError::TomlParse {
            message: format!("in file {}: {}", path, message),
            line,
            column,
        },
        PeaError::ConfigValidation { field, reason } => PeaError::ConfigValidation {
            field,
            reason: format!("{} (in file {})", reason, path),
        },
        other => other,
    })
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> PeaError {
    PeaError::ConfigValidation {
        field: field.into(),
        reason: reason.into(),
    }
}

fn toml_error(content: &str, message: &str, span: Option<Range<usize>>) -> PeaError {
    let (line, column) = span
        .map(|span| line_column(content, span.start))
        .unwrap_or((0, 0));
    PeaError::TomlParse {
        message: message.trim().to_string(),
        line,
        column,
    }
}

/// One-based line and column of a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = &content.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|pos| pos + 1)
        .unwrap_or(0);
    (line, offset - line_start + 1)
}
