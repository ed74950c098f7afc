//! Asset graph: entries, dependencies, asset groups and compiled assets
//!
//! The orchestrator seeds the graph with [`AssetGraph::initialize`] and then
//! reports resolver results through [`AssetGraph::resolve_dependency`] and
//! transformer results through [`AssetGraph::resolve_asset_group`]. Both
//! reconcile edges instead of rebuilding, so unaffected subtrees survive
//! incremental rebuilds.

mod deferral;
pub mod node;

use std::sync::Arc;

use indexmap::IndexSet;
use pea_config::toml::DEFAULT_LARGEST_ASSET_COUNT;
use pea_config::BundleSection;
use pea_core::error::{PeaError, PeaResult};
use pea_core::types::{Asset, AssetGroup, Dependency, Target};
use tracing::{debug, info};

use crate::graph::{Graph, GraphNode, TraversalActions};
use crate::observer::NodeObserver;

pub use node::{
    asset_group_id, asset_reference_id, node_from_asset, node_from_asset_group,
    node_from_asset_reference, node_from_dependency, AssetGraphNode, NodeKind, ROOT_NODE_ID,
};

/// Tunables of the asset graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    /// Skip transforming side-effect free re-exports nobody uses
    pub defer_weak_dependencies: bool,
    /// Number of assets listed by [`AssetGraph::report`]
    pub largest_asset_count: usize,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            defer_weak_dependencies: true,
            largest_asset_count: DEFAULT_LARGEST_ASSET_COUNT,
        }
    }
}

impl From<&BundleSection> for GraphOptions {
    fn from(bundle: &BundleSection) -> Self {
        Self {
            defer_weak_dependencies: bundle.defer_weak_dependencies,
            largest_asset_count: bundle.largest_asset_count,
        }
    }
}

/// Input of [`AssetGraph::initialize`]; use entries with targets, or a single
/// asset group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitOptions {
    pub entries: Option<Vec<String>>,
    pub targets: Option<Vec<Target>>,
    pub asset_group: Option<AssetGroup>,
}

impl InitOptions {
    /// Build every entry for every target
    pub fn from_entries(entries: Vec<String>, targets: Vec<Target>) -> Self {
        Self {
            entries: Some(entries),
            targets: Some(targets),
            asset_group: None,
        }
    }

    /// Start from a single asset group
    pub fn from_asset_group(asset_group: AssetGroup) -> Self {
        Self {
            asset_group: Some(asset_group),
            ..Self::default()
        }
    }

    /// Entries and targets of a `[bundle]` section
    pub fn from_config(bundle: &BundleSection) -> Self {
        Self::from_entries(bundle.entries.clone(), bundle.targets())
    }
}

/// Outcome of [`AssetGraph::resolve_dependency`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyResolution {
    /// No candidate; the dependency keeps its current children
    Unresolved,
    /// The subtree was left unexpanded
    Deferred,
    /// The dependency now points at the asset group
    Connected { asset_group_id: String },
}

/// Dependency graph of a build session
#[derive(Debug)]
pub struct AssetGraph {
    graph: Graph<AssetGraphNode>,
    options: GraphOptions,
    /// Ids of dependencies whose last resolution was deferred
    deferred: IndexSet<String>,
}

impl AssetGraph {
    /// Create a new empty asset graph with default options
    pub fn new() -> Self {
        Self::with_options(GraphOptions::default())
    }

    pub fn with_options(options: GraphOptions) -> Self {
        Self {
            graph: Graph::new(),
            options,
            deferred: IndexSet::new(),
        }
    }

    /// Create a graph reporting node additions and removals to `observer`
    pub fn with_observer(
        options: GraphOptions,
        observer: Arc<dyn NodeObserver<AssetGraphNode>>,
    ) -> Self {
        Self {
            graph: Graph::with_observer(observer),
            options,
            deferred: IndexSet::new(),
        }
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    /// Read-only view of the underlying graph
    pub fn graph(&self) -> &Graph<AssetGraphNode> {
        &self.graph
    }

    pub fn contains(&self, id: &str) -> bool {
        self.graph.has_node(id)
    }

    pub fn get_node(&self, id: &str) -> Option<&AssetGraphNode> {
        self.graph.get_node(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Set the root and connect it to the entry dependencies or asset group
    pub fn initialize(&mut self, options: InitOptions) -> PeaResult<()> {
        let InitOptions {
            entries,
            targets,
            asset_group,
        } = options;

        let nodes = match (entries, asset_group) {
            (Some(_), Some(_)) => {
                return Err(PeaError::configuration(
                    "Entries and an asset group cannot both initialize the graph",
                ))
            },
            (Some(entries), None) => {
                let targets = targets.ok_or_else(|| {
                    PeaError::configuration("Targets are required when entries are specified")
                })?;
                info!(
                    entries = entries.len(),
                    targets = targets.len(),
                    "initializing asset graph from entries"
                );
                entries
                    .iter()
                    .flat_map(|entry| {
                        targets
                            .iter()
                            .map(move |target| node_from_dependency(Dependency::entry(entry.as_str(), target)))
                    })
                    .collect()
            },
            (None, Some(asset_group)) => {
                info!(file = %asset_group.file_path, "initializing asset graph from asset group");
                vec![node_from_asset_group(asset_group)]
            },
            (None, None) => Vec::new(),
        };

        self.graph.set_root_node(AssetGraphNode::Root);
        self.graph.replace_nodes_connected_to(ROOT_NODE_ID, nodes)?;
        self.sweep_deferred();
        Ok(())
    }

    /// Record the resolver's result for `dependency`.
    ///
    /// `None` leaves the dependency as it is. Otherwise the dependency is
    /// pointed at the asset group, unless the deferral policy decides the
    /// group is not needed.
    pub fn resolve_dependency(
        &mut self,
        dependency: &Dependency,
        asset_group: Option<&AssetGroup>,
    ) -> PeaResult<DependencyResolution> {
        let Some(asset_group) = asset_group else {
            debug!(dependency = %dependency.module_specifier, "dependency unresolved");
            return Ok(DependencyResolution::Unresolved);
        };
        if !self.graph.has_node(&dependency.id) {
            return Err(PeaError::unknown_node(dependency.id.as_str()));
        }

        if self.options.defer_weak_dependencies
            && deferral::should_defer(self, dependency, asset_group)?
        {
            debug!(dependency = %dependency.module_specifier, "deferring weak dependency");
            self.deferred.insert(dependency.id.clone());
            return Ok(DependencyResolution::Deferred);
        }

        let group_node = node_from_asset_group(asset_group.clone());
        let asset_group_id = group_node.id().to_string();
        self.deferred.shift_remove(&dependency.id);
        self.graph
            .replace_nodes_connected_to(&dependency.id, vec![group_node])?;
        self.sweep_deferred();

        debug!(
            dependency = %dependency.module_specifier,
            file = %asset_group.file_path,
            "dependency resolved"
        );
        Ok(DependencyResolution::Connected { asset_group_id })
    }

    /// Record the assets a transformer produced for `asset_group`.
    ///
    /// Assets and dependencies that already exist keep their node and edges,
    /// so resolutions recorded on an earlier pass survive; their payload is
    /// refreshed when it changed. Assets no longer produced are pruned.
    pub fn resolve_asset_group(&mut self, asset_group: &AssetGroup, assets: Vec<Asset>) -> PeaResult<()> {
        let group_id = asset_group_id(asset_group);
        if !self.graph.has_node(&group_id) {
            return Err(PeaError::unknown_node(group_id));
        }

        let assets: Vec<Arc<Asset>> = assets.into_iter().map(Arc::new).collect();
        self.graph.replace_nodes_connected_to(
            &group_id,
            assets.iter().cloned().map(AssetGraphNode::Asset).collect(),
        )?;

        for asset in &assets {
            self.graph.update_node(AssetGraphNode::Asset(asset.clone()))?;

            let mut dependency_nodes = Vec::with_capacity(asset.dependencies().len());
            for dependency in asset.dependencies() {
                let dependency_node = node_from_dependency(dependency.clone());
                if self.graph.has_node(&dependency.id) {
                    self.graph.update_node(dependency_node.clone())?;
                } else {
                    self.deferred.shift_remove(&dependency.id);
                }
                dependency_nodes.push(dependency_node);
            }
            self.graph
                .replace_nodes_connected_to(&asset.id, dependency_nodes)?;
        }
        self.sweep_deferred();

        debug!(
            file = %asset_group.file_path,
            assets = assets.len(),
            "asset group resolved"
        );
        Ok(())
    }

    /// Point `dependency` at an asset that lives in another bundle
    pub fn reference_asset(&mut self, dependency: &Dependency, asset: Arc<Asset>) -> PeaResult<()> {
        if !self.graph.has_node(&dependency.id) {
            return Err(PeaError::unknown_node(dependency.id.as_str()));
        }
        self.deferred.shift_remove(&dependency.id);
        self.graph
            .replace_nodes_connected_to(&dependency.id, vec![node_from_asset_reference(asset)])?;
        self.sweep_deferred();
        Ok(())
    }

    /// Dependencies of `asset`; empty when the asset is not in the graph
    pub fn get_dependencies(&self, asset: &Asset) -> PeaResult<Vec<Arc<Dependency>>> {
        self.graph
            .get_nodes_connected_from(&asset.id)
            .into_iter()
            .map(|node| node.expect_dependency().cloned())
            .collect()
    }

    /// The asset `dependency` resolves to.
    ///
    /// Real assets win; the first asset reference is used when no real asset
    /// is reachable.
    pub fn get_dependency_resolution(&self, dependency: &Dependency) -> Option<Arc<Asset>> {
        if !self.graph.has_node(&dependency.id) {
            return None;
        }

        let mut reference: Option<Arc<Asset>> = None;
        let asset = self.graph.traverse(
            |node, _, actions| match node {
                AssetGraphNode::Asset(asset) => {
                    actions.stop();
                    Some(asset.clone())
                },
                AssetGraphNode::AssetReference { asset, .. } => {
                    if reference.is_none() {
                        reference = Some(asset.clone());
                    }
                    None
                },
                _ => None,
            },
            Some(&dependency.id),
        );

        asset.or(reference)
    }

    /// Every dependency that imports `asset`
    pub fn get_incoming_dependencies(&self, asset: &Asset) -> PeaResult<Vec<Arc<Dependency>>> {
        self.graph
            .find_ancestors(&asset.id, |node| node.kind() == NodeKind::Dependency)
            .into_iter()
            .map(|node| node.expect_dependency().cloned())
            .collect()
    }

    /// Traverse asset nodes only, walking through the nodes in between
    pub fn traverse_assets<C, F>(&self, visit: F, start: Option<&str>) -> Option<C>
    where
        C: Clone,
        F: FnMut(Arc<Asset>, Option<&C>, &mut TraversalActions) -> Option<C>,
    {
        self.graph
            .filtered_traverse(|node| node.as_asset().cloned(), visit, start)
    }

    /// The first asset on every branch from the root
    pub fn get_entry_assets(&self) -> Vec<Arc<Asset>> {
        let mut entries = Vec::new();
        self.traverse_assets(
            |asset, _, actions| {
                entries.push(asset);
                actions.skip_children();
                None::<()>
            },
            None,
        );
        entries
    }

    pub fn get_asset(&self, id: &str) -> Option<&Arc<Asset>> {
        self.graph.get_node(id).and_then(AssetGraphNode::as_asset)
    }

    /// All assets in the graph, in insertion order
    pub fn assets(&self) -> impl Iterator<Item = &Arc<Asset>> {
        self.graph.nodes().filter_map(AssetGraphNode::as_asset)
    }

    /// Whether the last resolution of `dependency` was deferred
    pub fn is_deferred(&self, dependency: &Dependency) -> bool {
        self.deferred.contains(&dependency.id)
    }

    /// Dependencies currently left unexpanded by the deferral policy
    pub fn deferred_dependencies(&self) -> Vec<Arc<Dependency>> {
        self.deferred
            .iter()
            .filter_map(|id| self.graph.get_node(id))
            .filter_map(AssetGraphNode::as_dependency)
            .cloned()
            .collect()
    }

    /// Forget deferred dependencies pruned by the last reconciliation
    fn sweep_deferred(&mut self) {
        let graph = &self.graph;
        self.deferred.retain(|id| graph.has_node(id));
    }

    /// Dependencies with nothing connected yet that are not deferred
    pub fn unresolved_dependencies(&self) -> Vec<Arc<Dependency>> {
        self.graph
            .nodes()
            .filter_map(AssetGraphNode::as_dependency)
            .filter(|dependency| {
                !self.deferred.contains(&dependency.id)
                    && self.graph.get_nodes_connected_from(&dependency.id).is_empty()
            })
            .cloned()
            .collect()
    }
}

impl Default for AssetGraph {
    fn default() -> Self {
        Self::new()
    }
}
