//! Node lifecycle hooks
//!
//! An observer is injected when a graph is built and hears about every node
//! insertion and removal, including nodes removed by pruning. The graph does
//! not care what the observer does with it.

use dashmap::DashSet;

use crate::graph::GraphNode;

/// Receives node additions and removals
pub trait NodeObserver<N>: Send + Sync {
    fn on_node_added(&self, node: &N) {
        let _ = node;
    }

    fn on_node_removed(&self, node: &N) {
        let _ = node;
    }
}

/// Observer collecting the ids of added and removed nodes.
///
/// The sets hold the net change since the last drain: a node added and then
/// removed only shows up as removed.
#[derive(Debug, Default)]
pub struct InvalidationTracker {
    added: DashSet<String>,
    removed: DashSet<String>,
}

impl InvalidationTracker {
    /// Create a new tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the ids added since the last call, sorted
    pub fn take_added(&self) -> Vec<String> {
        drain_sorted(&self.added)
    }

    /// Drain the ids removed since the last call, sorted
    pub fn take_removed(&self) -> Vec<String> {
        drain_sorted(&self.removed)
    }

    pub fn was_removed(&self, id: &str) -> bool {
        self.removed.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl<N: GraphNode> NodeObserver<N> for InvalidationTracker {
    fn on_node_added(&self, node: &N) {
        self.removed.remove(node.id());
        self.added.insert(node.id().to_string());
    }

    fn on_node_removed(&self, node: &N) {
        self.added.remove(node.id());
        self.removed.insert(node.id().to_string());
    }
}

fn drain_sorted(set: &DashSet<String>) -> Vec<String> {
    let mut ids = Vec::with_capacity(set.len());
    set.retain(|id| {
        ids.push(id.clone());
        false
    });
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl GraphNode for Named {
        fn id(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_tracker_records_net_changes() {
        let tracker = InvalidationTracker::new();
        tracker.on_node_added(&Named("a"));
        tracker.on_node_added(&Named("b"));
        tracker.on_node_removed(&Named("b"));

        assert_eq!(tracker.take_added(), vec!["a".to_string()]);
        assert!(tracker.was_removed("b"));
        assert_eq!(tracker.take_removed(), vec!["b".to_string()]);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_default_hooks_are_noops() {
        struct Silent;
        impl NodeObserver<Named> for Silent {}

        let silent = Silent;
        silent.on_node_added(&Named("a"));
        silent.on_node_removed(&Named("a"));
    }
}
