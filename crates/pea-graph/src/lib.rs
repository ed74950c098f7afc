//! # pea-graph
//!
//! Incremental dependency graph for the Pea bundler.
//!
//! This crate provides:
//! - A generic directed graph with diff-based edge reconciliation and
//!   reachability pruning
//! - The asset graph protocol driven by resolver and transformer results
//! - Deferral of unused side-effect free re-exports
//! - Node lifecycle observers for cache invalidation
//! - A single-writer handle for multi-threaded orchestrators
//!
//! ## Architecture
//!
//! - `graph`: Generic graph, reconciliation and traversals
//! - `asset_graph`: Node kinds and the asset graph protocol
//! - `observer`: Node addition/removal hooks
//! - `shared`: Lock-guarded shared handle
//! - `report`: Asset size and timing summary

pub mod asset_graph;
pub mod graph;
pub mod observer;
pub mod report;
pub mod shared;

pub use asset_graph::{
    AssetGraph, AssetGraphNode, DependencyResolution, GraphOptions, InitOptions, NodeKind,
    ROOT_NODE_ID,
};
pub use graph::{Graph, GraphNode, TraversalActions};
pub use observer::{InvalidationTracker, NodeObserver};
pub use report::{AssetGraphReport, AssetSummary};
pub use shared::SharedAssetGraph;
