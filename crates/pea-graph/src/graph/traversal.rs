//! Cycle-safe traversals over a [`Graph`]

use std::collections::HashSet;

use petgraph::stable_graph::NodeIndex;

use super::{Graph, GraphNode};

/// Control handle passed to traversal visitors
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraversalActions {
    skipped: bool,
    stopped: bool,
}

impl TraversalActions {
    /// Do not descend into the current node's children
    pub fn skip_children(&mut self) {
        self.skipped = true;
    }

    /// End the traversal after the current node
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl<N: GraphNode> Graph<N> {
    /// Depth-first traversal from `start` (the root by default).
    ///
    /// The visitor receives each reachable node once, together with the
    /// context returned for its parent. Returning `Some` hands a new context
    /// to the node's children, `None` passes the inherited one along. The
    /// last context produced is returned.
    pub fn traverse<C, F>(&self, mut visit: F, start: Option<&str>) -> Option<C>
    where
        C: Clone,
        F: FnMut(&N, Option<&C>, &mut TraversalActions) -> Option<C>,
    {
        let start = match start {
            Some(id) => *self.node_map.get(id)?,
            None => self.root?,
        };

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack: Vec<(NodeIndex, Option<C>)> = vec![(start, None)];
        let mut last = None;

        while let Some((index, inherited)) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            let Some(node) = self.graph.node_weight(index) else {
                continue;
            };

            let mut actions = TraversalActions::default();
            let produced = visit(node, inherited.as_ref(), &mut actions);
            if produced.is_some() {
                last = produced.clone();
            }
            if actions.is_stopped() {
                break;
            }
            if actions.is_skipped() {
                continue;
            }

            let context = produced.or(inherited);
            for child in self.children(index).into_iter().rev() {
                if !visited.contains(&child) {
                    stack.push((child, context.clone()));
                }
            }
        }

        last
    }

    /// Like [`Graph::traverse`], but only nodes `project` maps to a value
    /// reach the visitor. Other nodes are walked through transparently.
    pub fn filtered_traverse<T, C, P, F>(
        &self,
        mut project: P,
        mut visit: F,
        start: Option<&str>,
    ) -> Option<C>
    where
        C: Clone,
        P: FnMut(&N) -> Option<T>,
        F: FnMut(T, Option<&C>, &mut TraversalActions) -> Option<C>,
    {
        self.traverse(
            |node, context, actions| match project(node) {
                Some(value) => visit(value, context, actions),
                None => None,
            },
            start,
        )
    }

    /// Every ancestor of `id` matching `predicate`, deduplicated.
    ///
    /// All upward paths are followed up to the root, past matching nodes.
    /// The start node itself is never reported.
    pub fn find_ancestors<P>(&self, id: &str, mut predicate: P) -> Vec<&N>
    where
        P: FnMut(&N) -> bool,
    {
        let Some(&start) = self.node_map.get(id) else {
            return Vec::new();
        };

        let mut visited = HashSet::from([start]);
        let mut stack: Vec<NodeIndex> = self.parents(start).into_iter().rev().collect();
        let mut found = Vec::new();

        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            let Some(node) = self.graph.node_weight(index) else {
                continue;
            };
            if predicate(node) {
                found.push(node);
            }
            stack.extend(self.parents(index).into_iter().rev());
        }

        found
    }
}
