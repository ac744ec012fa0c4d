//! Datacenter-aware round-robin

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use tracing::{debug, info};

use super::{live_nodes, with_node, without_node, LoadBalancingPolicy, QueryHint, QueryPlan, Rotation};
use crate::node::{NodeDistance, NodeView};

/// Live nodes grouped by datacenter
///
/// Nodes without a datacenter label are treated as local. Each node lives in
/// exactly one group.
#[derive(Debug, Clone)]
struct Membership {
    local_dc: Option<Arc<str>>,
    local: Arc<[NodeView]>,
    remote: BTreeMap<Arc<str>, Arc<[NodeView]>>,
}

impl Membership {
    fn new(local_dc: Option<Arc<str>>) -> Self {
        Self { local_dc, local: Arc::from(Vec::new()), remote: BTreeMap::new() }
    }

    fn is_local(&self, node: &NodeView) -> bool {
        match (node.datacenter(), self.local_dc.as_deref()) {
            (Some(dc), Some(local)) => dc == local,
            _ => true,
        }
    }

    fn contains(&self, node: &NodeView) -> bool {
        self.local.contains(node) || self.remote.values().any(|nodes| nodes.contains(node))
    }

    fn insert(&mut self, node: &NodeView) {
        if self.local_dc.is_none() {
            if let Some(dc) = node.datacenter() {
                info!(local_dc = dc, node = %node, "Inferred local datacenter");
                self.local_dc = Some(Arc::from(dc));
            }
        }
        if self.contains(node) {
            return;
        }

        let group = match node.datacenter() {
            Some(dc) if !self.is_local(node) => {
                self.remote.entry(Arc::from(dc)).or_insert_with(|| Arc::from(Vec::new()))
            }
            _ => &mut self.local,
        };
        if let Some(next) = with_node(group, node) {
            *group = next;
        }
    }

    fn remove(&mut self, node: &NodeView) {
        if let Some(next) = without_node(&self.local, node) {
            self.local = next;
        }
        for nodes in self.remote.values_mut() {
            if let Some(next) = without_node(nodes, node) {
                *nodes = next;
            }
        }
        self.remote.retain(|_, nodes| !nodes.is_empty());
    }
}

/// Prefers nodes of the local datacenter, falling back to a capped number of
/// nodes per remote datacenter
///
/// A plan is the local rotation followed, for each remote datacenter in name
/// order, by a rotation over the first `used_hosts_per_remote_dc` nodes of
/// that datacenter. Those are exactly the nodes [`distance`] reports as
/// `Remote`, so a plan never yields an `Ignored` node.
///
/// [`distance`]: LoadBalancingPolicy::distance Remote nodes are left out of plans for datacenter-local
/// consistency levels unless explicitly allowed, since a remote coordinator
/// cannot satisfy them.
///
/// The local datacenter is either configured or taken from the first node
/// seen with a datacenter label.
#[derive(Debug)]
pub struct DcAwareRoundRobinPolicy {
    configured_local_dc: Option<Arc<str>>,
    used_hosts_per_remote_dc: usize,
    allow_remote_dcs_for_local_consistency: bool,
    membership: RwLock<Arc<Membership>>,
    index: AtomicUsize,
}

impl DcAwareRoundRobinPolicy {
    /// Local-only policy that infers its datacenter
    pub fn new() -> Self {
        Self {
            configured_local_dc: None,
            used_hosts_per_remote_dc: 0,
            allow_remote_dcs_for_local_consistency: false,
            membership: RwLock::new(Arc::new(Membership::new(None))),
            index: AtomicUsize::new(0),
        }
    }

    pub fn with_local_dc(mut self, local_dc: impl Into<Arc<str>>) -> Self {
        let local_dc = local_dc.into();
        self.configured_local_dc = Some(Arc::clone(&local_dc));
        self.membership = RwLock::new(Arc::new(Membership::new(Some(local_dc))));
        self
    }

    pub fn with_used_hosts_per_remote_dc(mut self, count: usize) -> Self {
        self.used_hosts_per_remote_dc = count;
        self
    }

    pub fn allow_remote_dcs_for_local_consistency(mut self, allow: bool) -> Self {
        self.allow_remote_dcs_for_local_consistency = allow;
        self
    }

    /// Configured or inferred local datacenter
    pub fn local_dc(&self) -> Option<Arc<str>> {
        self.membership.read().local_dc.clone()
    }

    pub fn used_hosts_per_remote_dc(&self) -> usize {
        self.used_hosts_per_remote_dc
    }

    fn snapshot(&self) -> Arc<Membership> {
        self.membership.read().clone()
    }

    fn update(&self, apply: impl FnOnce(&mut Membership)) {
        let mut guard = self.membership.write();
        let mut next = Membership::clone(&guard);
        apply(&mut next);
        *guard = Arc::new(next);
    }

    fn remote_allowed(&self, hint: &QueryHint) -> bool {
        if self.used_hosts_per_remote_dc == 0 {
            return false;
        }
        match hint.consistency {
            Some(cl) if cl.is_dc_local() => self.allow_remote_dcs_for_local_consistency,
            _ => true,
        }
    }
}

impl Default for DcAwareRoundRobinPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadBalancingPolicy for DcAwareRoundRobinPolicy {
    fn init(&self, nodes: &[NodeView]) {
        let mut membership = Membership::new(self.configured_local_dc.clone());
        for node in live_nodes(nodes) {
            membership.insert(&node);
        }

        let local = membership.local.len();
        let start = if local == 0 { 0 } else { rand::thread_rng().gen_range(0..local) };
        debug!(
            local_dc = membership.local_dc.as_deref().unwrap_or("<none>"),
            local,
            remote_dcs = membership.remote.len(),
            "Initialized datacenter-aware policy"
        );
        *self.membership.write() = Arc::new(membership);
        self.index.store(start, Ordering::Relaxed);
    }

    fn distance(&self, node: &NodeView) -> NodeDistance {
        let snapshot = self.snapshot();
        if snapshot.is_local(node) {
            return NodeDistance::Local;
        }
        match node.datacenter().and_then(|dc| snapshot.remote.get(dc)) {
            Some(nodes) if nodes.iter().take(self.used_hosts_per_remote_dc).any(|n| n == node) => {
                NodeDistance::Remote
            }
            _ => NodeDistance::Ignored,
        }
    }

    fn new_query_plan(&self, _keyspace: Option<&str>, hint: &QueryHint) -> QueryPlan {
        let snapshot = self.snapshot();
        let counter = self.index.fetch_add(1, Ordering::Relaxed);

        let mut plan = QueryPlan::from(Rotation::full(Arc::clone(&snapshot.local), counter));
        if !self.remote_allowed(hint) {
            return plan;
        }
        for nodes in snapshot.remote.values() {
            plan = plan.then(Rotation::new(Arc::clone(nodes), counter, self.used_hosts_per_remote_dc));
        }
        plan
    }

    fn on_up(&self, node: &NodeView) {
        debug!(node = %node, "Node up");
        self.update(|m| m.insert(node));
    }

    fn on_down(&self, node: &NodeView) {
        debug!(node = %node, "Node down");
        self.update(|m| m.remove(node));
    }

    fn on_add(&self, node: &NodeView) {
        debug!(node = %node, up = node.is_up(), "Node added");
        if node.is_up() {
            self.update(|m| m.insert(node));
        }
    }

    fn on_remove(&self, node: &NodeView) {
        debug!(node = %node, "Node removed");
        self.update(|m| m.remove(node));
    }
}
