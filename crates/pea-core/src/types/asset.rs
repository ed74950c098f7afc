//! Asset groups and compiled assets.
//!
//! An asset group is what a resolver picks for an import; an asset is what a
//! transformer produces from a group. The graph only stores these values.

use super::{Dependency, Environment};
use crate::utils::{hash::content_id, path::normalize_path};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolution candidate prior to transformation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetGroup {
    pub file_path: Utf8PathBuf,
    pub pipeline: Option<String>,
    pub env: Environment,
    /// `false` when loading the module without using its exports is unobservable
    pub side_effects: bool,
}

/// Size and time statistics of a compiled asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetStats {
    /// Output size in bytes
    pub size: u64,
    /// Transformation time in milliseconds
    pub time: u64,
}

/// Generated code and source map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetOutput {
    pub code: String,
    pub map: Option<String>,
}

/// Compiled unit of source content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    /// Type tag, usually the output extension (`js`, `css`, ...)
    pub asset_type: String,
    pub file_path: Utf8PathBuf,
    pub env: Environment,
    /// Exported symbol name to local binding name
    pub symbols: BTreeMap<String, String>,
    pub stats: AssetStats,
    dependencies: Vec<Dependency>,
    output: Option<AssetOutput>,
}

impl AssetGroup {
    /// Create a group for `file_path`, normalizing the path
    pub fn new(file_path: impl AsRef<Utf8Path>, env: Environment) -> Self {
        Self {
            file_path: normalize_path(file_path.as_ref()),
            pipeline: None,
            env,
            side_effects: true,
        }
    }

    pub fn with_pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    /// Mark the module as side-effect free
    pub fn side_effect_free(mut self) -> Self {
        self.side_effects = false;
        self
    }
}

impl Asset {
    /// Create a new asset; the id is derived from path, type and environment
    pub fn new(file_path: impl AsRef<Utf8Path>, asset_type: impl Into<String>, env: Environment) -> Self {
        let file_path = normalize_path(file_path.as_ref());
        let asset_type = asset_type.into();
        let id = content_id(&(&file_path, &asset_type, &env));
        Self {
            id,
            asset_type,
            file_path,
            env,
            symbols: BTreeMap::new(),
            stats: AssetStats::default(),
            dependencies: Vec::new(),
            output: None,
        }
    }

    /// Export `exported` bound to the local name `local`
    pub fn with_symbol(mut self, exported: impl Into<String>, local: impl Into<String>) -> Self {
        self.symbols.insert(exported.into(), local.into());
        self
    }

    pub fn with_stats(mut self, size: u64, time: u64) -> Self {
        self.stats = AssetStats { size, time };
        self
    }

    pub fn with_output(mut self, code: impl Into<String>, map: Option<String>) -> Self {
        self.output = Some(AssetOutput {
            code: code.into(),
            map,
        });
        self
    }

    /// Record an import of this asset; its source asset is set to this asset
    pub fn add_dependency(&mut self, dependency: Dependency) -> &Dependency {
        let dependency = dependency.with_source_asset(self.id.clone());
        self.dependencies.push(dependency);
        &self.dependencies[self.dependencies.len() - 1]
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.add_dependency(dependency);
        self
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn code(&self) -> Option<&str> {
        self.output.as_ref().map(|output| output.code.as_str())
    }

    pub fn map(&self) -> Option<&str> {
        self.output.as_ref().and_then(|output| output.map.as_deref())
    }
}
