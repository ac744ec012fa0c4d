//! Load balancing: which nodes to contact, in which order
//!
//! A [`LoadBalancingPolicy`] turns the current live membership into a
//! [`QueryPlan`] per operation. Plans are snapshots: membership changes
//! reported through the lifecycle hooks only affect plans created afterwards.
//!
//! | Policy | Order | Locality |
//! |--------|-------|----------|
//! | [`RoundRobinPolicy`] | shared rotation over all live nodes | ignored |
//! | [`DcAwareRoundRobinPolicy`] | local rotation, then capped remote rotations | datacenter |

pub mod dc_aware;
pub mod plan;
pub mod round_robin;

use std::fmt;
use std::sync::Arc;

pub use dc_aware::DcAwareRoundRobinPolicy;
pub use plan::{QueryPlan, Rotation};
pub use round_robin::RoundRobinPolicy;

use crate::consistency::ConsistencyLevel;
use crate::node::{NodeDistance, NodeView};

/// Per-operation routing hint
///
/// Round-robin ignores it entirely; locality-aware policies read the
/// consistency level, and token-aware variants would read the routing key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryHint {
    pub routing_key: Option<Vec<u8>>,
    pub consistency: Option<ConsistencyLevel>,
    pub idempotent: bool,
}

impl QueryHint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_routing_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.routing_key = Some(key.into());
        self
    }

    pub fn with_consistency(mut self, consistency: ConsistencyLevel) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = idempotent;
        self
    }
}

/// Decides the order in which nodes are tried for each operation
///
/// Implementations are shared by every in-flight operation of a client, so
/// all methods take `&self` and must be safe to call concurrently.
pub trait LoadBalancingPolicy: Send + Sync + fmt::Debug {
    /// Seed the policy with the membership known when the client starts
    fn init(&self, nodes: &[NodeView]);

    /// Classify a node for connection pool sizing
    fn distance(&self, node: &NodeView) -> NodeDistance;

    /// Produce the candidate order for one operation
    ///
    /// Returns an empty plan, not an error, when no node is live.
    fn new_query_plan(&self, keyspace: Option<&str>, hint: &QueryHint) -> QueryPlan;

    /// A known node came back up
    fn on_up(&self, node: &NodeView);

    /// A known node went down
    fn on_down(&self, node: &NodeView);

    /// A node joined the cluster
    fn on_add(&self, node: &NodeView);

    /// A node left the cluster
    fn on_remove(&self, node: &NodeView);
}

impl<P: LoadBalancingPolicy + ?Sized> LoadBalancingPolicy for Arc<P> {
    fn init(&self, nodes: &[NodeView]) {
        (**self).init(nodes)
    }

    fn distance(&self, node: &NodeView) -> NodeDistance {
        (**self).distance(node)
    }

    fn new_query_plan(&self, keyspace: Option<&str>, hint: &QueryHint) -> QueryPlan {
        (**self).new_query_plan(keyspace, hint)
    }

    fn on_up(&self, node: &NodeView) {
        (**self).on_up(node)
    }

    fn on_down(&self, node: &NodeView) {
        (**self).on_down(node)
    }

    fn on_add(&self, node: &NodeView) {
        (**self).on_add(node)
    }

    fn on_remove(&self, node: &NodeView) {
        (**self).on_remove(node)
    }
}

/// Copy of `nodes` with `node` appended, or `None` if it is already present
pub(crate) fn with_node(nodes: &[NodeView], node: &NodeView) -> Option<Arc<[NodeView]>> {
    if nodes.contains(node) {
        return None;
    }
    let mut next = Vec::with_capacity(nodes.len() + 1);
    next.extend_from_slice(nodes);
    next.push(node.clone().with_up(true));
    Some(next.into())
}

/// Copy of `nodes` without `node`, or `None` if it was absent
pub(crate) fn without_node(nodes: &[NodeView], node: &NodeView) -> Option<Arc<[NodeView]>> {
    if !nodes.contains(node) {
        return None;
    }
    Some(nodes.iter().filter(|n| *n != node).cloned().collect::<Vec<_>>().into())
}

/// Live nodes from `nodes`, first occurrence wins
pub(crate) fn live_nodes(nodes: &[NodeView]) -> Vec<NodeView> {
    let mut live: Vec<NodeView> = Vec::with_capacity(nodes.len());
    for node in nodes.iter().filter(|n| n.is_up()) {
        if !live.contains(node) {
            live.push(node.clone());
        }
    }
    live
}
