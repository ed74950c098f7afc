//! Generic directed graph keyed by stable string identifiers
//!
//! Nodes live in a petgraph `StableDiGraph` so indices survive removals, with
//! an id index on the side. Edges carry no payload and have set semantics.
//! Every node is expected to be reachable from the root: removing an edge or
//! a node prunes whatever became unreachable.

mod traversal;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use pea_core::error::{PeaError, PeaResult};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use tracing::{debug, trace};

use crate::observer::NodeObserver;

pub use traversal::TraversalActions;

/// A value stored in a [`Graph`]
pub trait GraphNode {
    /// Identifier, unique within the graph and stable for the node's lifetime
    fn id(&self) -> &str;
}

/// Mutable directed graph with reachability-based pruning
pub struct Graph<N> {
    /// Underlying directed graph
    graph: StableDiGraph<N, ()>,
    /// Map from node id to NodeIndex, in insertion order
    node_map: IndexMap<String, NodeIndex>,
    root: Option<NodeIndex>,
    observer: Option<Arc<dyn NodeObserver<N>>>,
}

impl<N: GraphNode> Graph<N> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_map: IndexMap::new(),
            root: None,
            observer: None,
        }
    }

    /// Create a graph that reports node additions and removals to `observer`
    pub fn with_observer(observer: Arc<dyn NodeObserver<N>>) -> Self {
        let mut graph = Self::new();
        graph.observer = Some(observer);
        graph
    }

    pub fn set_observer(&mut self, observer: Option<Arc<dyn NodeObserver<N>>>) {
        self.observer = observer;
    }

    /// Get number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn get_node(&self, id: &str) -> Option<&N> {
        let index = self.node_map.get(id)?;
        self.graph.node_weight(*index)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.node_map
            .values()
            .filter_map(|index| self.graph.node_weight(*index))
    }

    pub fn root(&self) -> Option<&N> {
        self.root.and_then(|index| self.graph.node_weight(index))
    }

    /// Insert `node` (or keep the existing node with its id) and make it the root
    pub fn set_root_node(&mut self, node: N) {
        let index = self.add_node(node);
        self.root = Some(index);
    }

    /// Add a node; an existing node with the same id is kept as-is
    pub fn add_node(&mut self, node: N) -> NodeIndex {
        if let Some(existing) = self.node_map.get(node.id()) {
            return *existing;
        }

        trace!(id = node.id(), "adding node");
        if let Some(observer) = &self.observer {
            observer.on_node_added(&node);
        }
        let id = node.id().to_string();
        let index = self.graph.add_node(node);
        self.node_map.insert(id, index);
        index
    }

    /// Replace the payload of an existing node, keeping its edges.
    ///
    /// Returns `false` when the stored payload is already equal to `node`.
    pub fn update_node(&mut self, node: N) -> PeaResult<bool>
    where
        N: PartialEq,
    {
        let index = self.index_of(node.id())?;
        match self.graph.node_weight_mut(index) {
            Some(existing) if *existing == node => Ok(false),
            Some(existing) => {
                *existing = node;
                Ok(true)
            },
            None => Err(PeaError::unknown_node(node.id())),
        }
    }

    /// Remove a node and its edges, then prune children left unreachable
    pub fn remove_node(&mut self, id: &str) -> PeaResult<N> {
        let index = self.index_of(id)?;
        let children = self.children(index);
        let node = self
            .detach(index)
            .ok_or_else(|| PeaError::unknown_node(id))?;

        self.prune_unreachable(children);
        Ok(node)
    }

    /// Add an edge; returns `false` when it already existed
    pub fn add_edge(&mut self, from: &str, to: &str) -> PeaResult<bool> {
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;
        if self.graph.find_edge(from_index, to_index).is_some() {
            return Ok(false);
        }
        self.graph.add_edge(from_index, to_index, ());
        Ok(true)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(from), Some(to)) => self.graph.find_edge(*from, *to).is_some(),
            _ => false,
        }
    }

    /// Remove an edge, pruning `to` if it is no longer reachable from the root.
    ///
    /// Returns `false` when there was no such edge.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> PeaResult<bool> {
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;
        let removed = self.unlink(from_index, to_index);
        if removed {
            self.prune_unreachable([to_index]);
        }
        Ok(removed)
    }

    /// Nodes with an edge to `id` (parents), in insertion order
    pub fn get_nodes_connected_to(&self, id: &str) -> Vec<&N> {
        self.node_map
            .get(id)
            .map(|index| self.resolve(self.parents(*index)))
            .unwrap_or_default()
    }

    /// Nodes `id` has an edge to (children), in insertion order
    pub fn get_nodes_connected_from(&self, id: &str) -> Vec<&N> {
        self.node_map
            .get(id)
            .map(|index| self.resolve(self.children(*index)))
            .unwrap_or_default()
    }

    /// Reconcile the outgoing edges of `from` with `children`.
    ///
    /// Children already connected keep their node and subtree untouched.
    /// New children are inserted unless a node with the same id exists, in
    /// which case the existing node is reused. Children that are no longer
    /// listed lose their edge and are pruned once unreachable from the root.
    pub fn replace_nodes_connected_to(&mut self, from: &str, children: Vec<N>) -> PeaResult<()> {
        let from_index = self.index_of(from)?;
        let mut stale: IndexSet<NodeIndex> = self.children(from_index).into_iter().collect();

        for child in children {
            let child_index = match self.node_map.get(child.id()) {
                Some(index) => *index,
                None => self.add_node(child),
            };
            stale.shift_remove(&child_index);
            if self.graph.find_edge(from_index, child_index).is_none() {
                self.graph.add_edge(from_index, child_index, ());
            }
        }

        let mut unlinked = Vec::with_capacity(stale.len());
        for child_index in stale {
            if self.unlink(from_index, child_index) {
                unlinked.push(child_index);
            }
        }
        self.prune_unreachable(unlinked);
        Ok(())
    }

    fn index_of(&self, id: &str) -> PeaResult<NodeIndex> {
        self.node_map
            .get(id)
            .copied()
            .ok_or_else(|| PeaError::unknown_node(id))
    }

    fn resolve(&self, indices: Vec<NodeIndex>) -> Vec<&N> {
        indices
            .into_iter()
            .filter_map(|index| self.graph.node_weight(index))
            .collect()
    }

    /// Outgoing neighbors in insertion order
    fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(index, Direction::Outgoing)
    }

    /// Incoming neighbors in insertion order
    fn parents(&self, index: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(index, Direction::Incoming)
    }

    fn neighbors(&self, index: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        // petgraph lists the most recently added edge first
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(index, direction).collect();
        neighbors.reverse();
        neighbors
    }

    /// Remove the edge `from -> to` without pruning
    fn unlink(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        match self.graph.find_edge(from, to) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            },
            None => false,
        }
    }

    /// Remove a single node without looking at its children
    fn detach(&mut self, index: NodeIndex) -> Option<N> {
        let node = self.graph.remove_node(index)?;
        self.node_map.shift_remove(node.id());
        if self.root == Some(index) {
            self.root = None;
        }

        trace!(id = node.id(), "removed node");
        if let Some(observer) = &self.observer {
            observer.on_node_removed(&node);
        }
        Some(node)
    }

    fn reachable_from_root(&self) -> HashSet<NodeIndex> {
        let mut reachable = HashSet::new();
        let mut stack: Vec<NodeIndex> = self.root.into_iter().collect();
        while let Some(current) = stack.pop() {
            if reachable.insert(current) {
                stack.extend(self.graph.neighbors_directed(current, Direction::Outgoing));
            }
        }
        reachable
    }

    /// Remove every candidate the root cannot reach, along with its
    /// unreachable descendants. Reachability is computed once per call.
    fn prune_unreachable(&mut self, candidates: impl IntoIterator<Item = NodeIndex>) {
        if self.root.is_none() {
            return;
        }

        let mut stack: Vec<NodeIndex> = candidates
            .into_iter()
            .filter(|index| self.graph.contains_node(*index))
            .collect();
        if stack.is_empty() {
            return;
        }

        let reachable = self.reachable_from_root();
        let mut visited = HashSet::new();
        let mut doomed = Vec::new();
        stack.reverse();
        while let Some(current) = stack.pop() {
            if reachable.contains(&current) || !visited.insert(current) {
                continue;
            }
            doomed.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        if doomed.is_empty() {
            return;
        }

        debug!(count = doomed.len(), "pruning unreachable nodes");
        for index in doomed {
            self.detach(index);
        }
    }
}

impl<N: GraphNode> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: GraphNode + fmt::Debug> fmt::Debug for Graph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("root", &self.root().map(|root| root.id()))
            .field("observed", &self.observer.is_some())
            .finish()
    }
}
