//! Single-writer handle over an [`AssetGraph`]
//!
//! Resolver and transformer workers finish out of order. All mutations go
//! through the write lock, and results for nodes pruned in the meantime are
//! dropped instead of failing the build.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use pea_core::error::PeaResult;
use pea_core::types::{Asset, AssetGroup, Dependency};
use tracing::debug;

use crate::asset_graph::{asset_group_id, AssetGraph, DependencyResolution, InitOptions};

/// Cloneable handle sharing one asset graph between threads
#[derive(Debug, Clone, Default)]
pub struct SharedAssetGraph {
    inner: Arc<RwLock<AssetGraph>>,
}

impl SharedAssetGraph {
    pub fn new(graph: AssetGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Shared access for queries; many readers may hold it at once
    pub fn read(&self) -> RwLockReadGuard<'_, AssetGraph> {
        self.inner.read()
    }

    /// Exclusive access for mutation
    pub fn write(&self) -> RwLockWriteGuard<'_, AssetGraph> {
        self.inner.write()
    }

    pub fn initialize(&self, options: InitOptions) -> PeaResult<()> {
        self.write().initialize(options)
    }

    /// Apply a resolver result; `None` when the dependency was pruned meanwhile
    pub fn resolve_dependency(
        &self,
        dependency: &Dependency,
        asset_group: Option<&AssetGroup>,
    ) -> PeaResult<Option<DependencyResolution>> {
        let mut graph = self.write();
        if !graph.contains(&dependency.id) {
            debug!(dependency = %dependency.module_specifier, "discarding late resolution");
            return Ok(None);
        }
        graph.resolve_dependency(dependency, asset_group).map(Some)
    }

    /// Apply a transformer result; `false` when the group was pruned meanwhile
    pub fn resolve_asset_group(&self, asset_group: &AssetGroup, assets: Vec<Asset>) -> PeaResult<bool> {
        let mut graph = self.write();
        if !graph.contains(&asset_group_id(asset_group)) {
            debug!(file = %asset_group.file_path, "discarding late transform result");
            return Ok(false);
        }
        graph.resolve_asset_group(asset_group, assets)?;
        Ok(true)
    }
}

impl From<AssetGraph> for SharedAssetGraph {
    fn from(graph: AssetGraph) -> Self {
        Self::new(graph)
    }
}
