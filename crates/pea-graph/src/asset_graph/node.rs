//! Asset graph node kinds and identity functions
//!
//! Node ids are derived from content, so structurally identical inputs land
//! on the same node across rebuilds.

use std::fmt;
use std::sync::Arc;

use pea_core::error::{PeaError, PeaResult};
use pea_core::types::{Asset, AssetGroup, Dependency};
use pea_core::utils::hash::content_id;

use crate::graph::GraphNode;

/// Id of the unique root node
pub const ROOT_NODE_ID: &str = "@@root";

/// Node of the asset graph
#[derive(Debug, Clone, PartialEq)]
pub enum AssetGraphNode {
    /// Graph entry point
    Root,
    Dependency(Arc<Dependency>),
    AssetGroup { id: String, group: Arc<AssetGroup> },
    Asset(Arc<Asset>),
    /// An asset materialized in another bundle's subgraph
    AssetReference { id: String, asset: Arc<Asset> },
}

/// Kind tag of an [`AssetGraphNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Dependency,
    AssetGroup,
    Asset,
    AssetReference,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Dependency => "dependency",
            NodeKind::AssetGroup => "asset_group",
            NodeKind::Asset => "asset",
            NodeKind::AssetReference => "asset_reference",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node id of an asset group
pub fn asset_group_id(group: &AssetGroup) -> String {
    content_id(group)
}

/// Node id of a reference to the asset with id `asset_id`
pub fn asset_reference_id(asset_id: &str) -> String {
    content_id(&(NodeKind::AssetReference.as_str(), asset_id))
}

pub fn node_from_dependency(dependency: impl Into<Arc<Dependency>>) -> AssetGraphNode {
    AssetGraphNode::Dependency(dependency.into())
}

pub fn node_from_asset_group(group: impl Into<Arc<AssetGroup>>) -> AssetGraphNode {
    let group = group.into();
    AssetGraphNode::AssetGroup {
        id: asset_group_id(&group),
        group,
    }
}

pub fn node_from_asset(asset: impl Into<Arc<Asset>>) -> AssetGraphNode {
    AssetGraphNode::Asset(asset.into())
}

pub fn node_from_asset_reference(asset: impl Into<Arc<Asset>>) -> AssetGraphNode {
    let asset = asset.into();
    AssetGraphNode::AssetReference {
        id: asset_reference_id(&asset.id),
        asset,
    }
}

impl AssetGraphNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            AssetGraphNode::Root => NodeKind::Root,
            AssetGraphNode::Dependency(_) => NodeKind::Dependency,
            AssetGraphNode::AssetGroup { .. } => NodeKind::AssetGroup,
            AssetGraphNode::Asset(_) => NodeKind::Asset,
            AssetGraphNode::AssetReference { .. } => NodeKind::AssetReference,
        }
    }

    pub fn as_dependency(&self) -> Option<&Arc<Dependency>> {
        match self {
            AssetGraphNode::Dependency(dependency) => Some(dependency),
            _ => None,
        }
    }

    pub fn as_asset_group(&self) -> Option<&Arc<AssetGroup>> {
        match self {
            AssetGraphNode::AssetGroup { group, .. } => Some(group),
            _ => None,
        }
    }

    /// The asset of an `Asset` node
    pub fn as_asset(&self) -> Option<&Arc<Asset>> {
        match self {
            AssetGraphNode::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    /// The asset of an `Asset` or `AssetReference` node
    pub fn underlying_asset(&self) -> Option<&Arc<Asset>> {
        match self {
            AssetGraphNode::Asset(asset) | AssetGraphNode::AssetReference { asset, .. } => {
                Some(asset)
            },
            _ => None,
        }
    }

    pub fn expect_dependency(&self) -> PeaResult<&Arc<Dependency>> {
        self.as_dependency()
            .ok_or_else(|| self.mismatch(NodeKind::Dependency.as_str()))
    }

    pub fn expect_asset_group(&self) -> PeaResult<&Arc<AssetGroup>> {
        self.as_asset_group()
            .ok_or_else(|| self.mismatch(NodeKind::AssetGroup.as_str()))
    }

    /// Like [`AssetGraphNode::underlying_asset`], failing on any other kind
    pub fn expect_underlying_asset(&self) -> PeaResult<&Arc<Asset>> {
        self.underlying_asset()
            .ok_or_else(|| self.mismatch("asset or asset_reference"))
    }

    fn mismatch(&self, expected: &'static str) -> PeaError {
        PeaError::InvariantViolation {
            id: self.id().to_string(),
            expected,
            found: self.kind().as_str(),
        }
    }
}

impl GraphNode for AssetGraphNode {
    fn id(&self) -> &str {
        match self {
            AssetGraphNode::Root => ROOT_NODE_ID,
            AssetGraphNode::Dependency(dependency) => &dependency.id,
            AssetGraphNode::AssetGroup { id, .. } => id,
            AssetGraphNode::Asset(asset) => &asset.id,
            AssetGraphNode::AssetReference { id, .. } => id,
        }
    }
}
