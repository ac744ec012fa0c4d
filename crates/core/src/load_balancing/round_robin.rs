//! Round-robin over every live node

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use tracing::debug;

use super::{live_nodes, with_node, without_node, LoadBalancingPolicy, QueryHint, QueryPlan, Rotation};
use crate::node::{NodeDistance, NodeView};

/// Cycles through all live nodes, ignoring locality and hints
///
/// Every plan walks the live list once, starting one position further than
/// the previous plan. The rotation counter is a single atomic shared by all
/// callers of this instance; two clients with separate instances rotate
/// independently.
#[derive(Debug)]
pub struct RoundRobinPolicy {
    live: RwLock<Arc<[NodeView]>>,
    index: AtomicUsize,
}

impl RoundRobinPolicy {
    pub fn new() -> Self {
        Self { live: RwLock::new(Arc::from(Vec::new())), index: AtomicUsize::new(0) }
    }

    /// Current live list, in rotation order
    pub fn live_nodes(&self) -> Arc<[NodeView]> {
        Arc::clone(&self.live.read())
    }

    fn add_live(&self, node: &NodeView) {
        let mut live = self.live.write();
        if let Some(next) = with_node(&live, node) {
            *live = next;
        }
    }

    fn remove_live(&self, node: &NodeView) {
        let mut live = self.live.write();
        if let Some(next) = without_node(&live, node) {
            *live = next;
        }
    }
}

impl Default for RoundRobinPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadBalancingPolicy for RoundRobinPolicy {
    fn init(&self, nodes: &[NodeView]) {
        let live = live_nodes(nodes);
        let start = if live.is_empty() { 0 } else { rand::thread_rng().gen_range(0..live.len()) };
        debug!(live = live.len(), start, "Initialized round-robin policy");
        *self.live.write() = live.into();
        self.index.store(start, Ordering::Relaxed);
    }

    fn distance(&self, _node: &NodeView) -> NodeDistance {
        NodeDistance::Local
    }

    fn new_query_plan(&self, _keyspace: Option<&str>, _hint: &QueryHint) -> QueryPlan {
        let snapshot = self.live_nodes();
        if snapshot.is_empty() {
            return QueryPlan::empty();
        }
        let counter = self.index.fetch_add(1, Ordering::Relaxed);
        QueryPlan::from(Rotation::full(snapshot, counter))
    }

    fn on_up(&self, node: &NodeView) {
        debug!(node = %node, "Node up");
        self.add_live(node);
    }

    fn on_down(&self, node: &NodeView) {
        debug!(node = %node, "Node down");
        self.remove_live(node);
    }

    fn on_add(&self, node: &NodeView) {
        debug!(node = %node, up = node.is_up(), "Node added");
        if node.is_up() {
            self.add_live(node);
        }
    }

    fn on_remove(&self, node: &NodeView) {
        debug!(node = %node, "Node removed");
        self.remove_live(node);
    }
}
