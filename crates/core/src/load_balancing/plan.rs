//! Lazy, single-pass candidate sequences

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::Arc;

use crate::node::NodeView;

/// One pass over a window of a node snapshot, starting at a rotating offset
///
/// The window is the first `limit` nodes of the snapshot. Every node in it is
/// yielded exactly once and nodes past it never are.
#[derive(Debug, Clone)]
pub struct Rotation {
    nodes: Arc<[NodeView]>,
    start: usize,
    taken: usize,
    limit: usize,
}

impl Rotation {
    /// Walk the first `limit` nodes of `nodes`, starting at
    /// `counter mod window`
    pub fn new(nodes: Arc<[NodeView]>, counter: usize, limit: usize) -> Self {
        let window = limit.min(nodes.len());
        let start = if window == 0 { 0 } else { counter % window };
        Self { limit: window, nodes, start, taken: 0 }
    }

    /// Walk every node of the snapshot once
    pub fn full(nodes: Arc<[NodeView]>, counter: usize) -> Self {
        let len = nodes.len();
        Self::new(nodes, counter, len)
    }

    fn remaining(&self) -> usize {
        self.limit - self.taken
    }
}

impl Iterator for Rotation {
    type Item = NodeView;

    fn next(&mut self) -> Option<NodeView> {
        if self.taken >= self.limit {
            return None;
        }
        let index = (self.start + self.taken) % self.limit;
        self.taken += 1;
        Some(self.nodes[index].clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rotation {}

impl FusedIterator for Rotation {}

/// Ordered candidate nodes for one operation attempt
///
/// A plan is a chain of [`Rotation`]s built from snapshots taken when the plan
/// was created. It is lazy (nodes are cloned out one at a time), finite and
/// single-pass; ask the policy for a new plan to start over.
#[derive(Debug, Clone, Default)]
pub struct QueryPlan {
    segments: VecDeque<Rotation>,
}

impl QueryPlan {
    /// A plan with no candidates
    pub fn empty() -> Self {
        Self::default()
    }

    /// A plan that tries `nodes` in the given order
    pub fn from_nodes(nodes: Vec<NodeView>) -> Self {
        Self::from(Rotation::full(nodes.into(), 0))
    }

    /// Append a rotation after the existing ones
    pub fn then(mut self, rotation: Rotation) -> Self {
        if rotation.remaining() > 0 {
            self.segments.push_back(rotation);
        }
        self
    }

    /// Whether the plan has no candidates left
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Rotation> for QueryPlan {
    fn from(rotation: Rotation) -> Self {
        Self::empty().then(rotation)
    }
}

impl Iterator for QueryPlan {
    type Item = NodeView;

    fn next(&mut self) -> Option<NodeView> {
        loop {
            let segment = self.segments.front_mut()?;
            if let Some(node) = segment.next() {
                return Some(node);
            }
            self.segments.pop_front();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.segments.iter().map(Rotation::remaining).sum();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for QueryPlan {}

impl FusedIterator for QueryPlan {}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::*;

    fn nodes(count: u16) -> Arc<[NodeView]> {
        (1..=count)
            .map(|port| NodeView::up(SocketAddr::from(([127, 0, 0, 1], port))))
            .collect::<Vec<_>>()
            .into()
    }

    fn ports(plan: impl Iterator<Item = NodeView>) -> Vec<u16> {
        plan.map(|n| n.address().port()).collect()
    }

    /// Validates `Rotation` wrap-around.
    ///
    /// Assertions:
    /// - Confirms the walk starts at `counter mod len` and wraps once.
    #[test]
    fn test_rotation_wraps_once() {
        assert_eq!(ports(Rotation::full(nodes(4), 6)), vec![3, 4, 1, 2]);
        assert_eq!(ports(Rotation::full(nodes(4), 0)), vec![1, 2, 3, 4]);
    }

    /// Validates `Rotation` limits.
    ///
    /// Assertions:
    /// - Confirms `limit` caps the number of yielded nodes.
    /// - Ensures a limited rotation only ever yields nodes from the first
    ///   `limit` positions of the snapshot, whatever the counter.
    /// - Confirms a limit above the snapshot size yields each node once.
    /// - Confirms an empty snapshot yields nothing.
    #[test]
    fn test_rotation_limit() {
        assert_eq!(ports(Rotation::new(nodes(5), 3, 2)), vec![2, 1]);
        assert_eq!(ports(Rotation::new(nodes(5), 4, 2)), vec![1, 2]);
        for counter in 0..10 {
            let window = ports(Rotation::new(nodes(5), counter, 2));
            assert_eq!(window.len(), 2);
            assert!(window.iter().all(|port| *port <= 2));
        }
        assert_eq!(Rotation::new(nodes(2), 0, 10).len(), 2);
        assert_eq!(Rotation::full(nodes(0), 17).next(), None);
        assert!(Rotation::new(nodes(3), 5, 0).next().is_none());
    }

    /// Validates chained segments inside a `QueryPlan`.
    ///
    /// Assertions:
    /// - Confirms segments are drained in order.
    /// - Confirms `len()` tracks the remaining candidates.
    /// - Confirms the plan stays exhausted once drained.
    #[test]
    fn test_query_plan_chains_segments() {
        let mut plan =
            QueryPlan::from(Rotation::full(nodes(2), 1)).then(Rotation::new(nodes(3), 0, 1));
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.next().map(|n| n.address().port()), Some(2));
        assert_eq!(plan.len(), 2);
        assert_eq!(ports(&mut plan), vec![1, 1]);
        assert!(plan.is_empty());
        assert_eq!(plan.next(), None);
    }

    /// Validates the empty and explicit-order constructors.
    ///
    /// Assertions:
    /// - Ensures `QueryPlan::empty()` has no candidates.
    /// - Confirms `from_nodes` keeps the given order.
    #[test]
    fn test_query_plan_constructors() {
        assert!(QueryPlan::empty().is_empty());
        let ordered = nodes(3).iter().rev().cloned().collect();
        assert_eq!(ports(QueryPlan::from_nodes(ordered)), vec![3, 2, 1]);
    }
}
