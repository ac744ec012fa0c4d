//! Read-only node snapshots supplied by cluster metadata

use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;

use nodewise_common::impl_name_conversions;

/// Snapshot of one cluster node as seen by cluster metadata
///
/// Identity is the address: two views of the same address compare equal even
/// when their liveness or locality labels differ, so a stale snapshot can
/// still be matched against the current membership.
#[derive(Debug, Clone)]
pub struct NodeView {
    address: SocketAddr,
    is_up: bool,
    datacenter: Option<Arc<str>>,
    rack: Option<Arc<str>>,
}

impl NodeView {
    /// Create a view of a node believed to be up
    pub fn up(address: SocketAddr) -> Self {
        Self { address, is_up: true, datacenter: None, rack: None }
    }

    /// Create a view of a node believed to be down
    pub fn down(address: SocketAddr) -> Self {
        Self { address, is_up: false, datacenter: None, rack: None }
    }

    /// Attach a datacenter label
    pub fn in_datacenter(mut self, datacenter: impl Into<Arc<str>>) -> Self {
        self.datacenter = Some(datacenter.into());
        self
    }

    /// Attach a rack label
    pub fn in_rack(mut self, rack: impl Into<Arc<str>>) -> Self {
        self.rack = Some(rack.into());
        self
    }

    /// Copy of this view with a different liveness flag
    pub fn with_up(mut self, is_up: bool) -> Self {
        self.is_up = is_up;
        self
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn is_up(&self) -> bool {
        self.is_up
    }

    pub fn datacenter(&self) -> Option<&str> {
        self.datacenter.as_deref()
    }

    pub fn rack(&self) -> Option<&str> {
        self.rack.as_deref()
    }
}

impl PartialEq for NodeView {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for NodeView {}

impl Hash for NodeView {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Display for NodeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.datacenter {
            Some(dc) => write!(f, "{} ({})", self.address, dc),
            None => write!(f, "{}", self.address),
        }
    }
}

/// How a load-balancing policy classifies a node
///
/// Connection managers size their pools from this: local nodes get the
/// largest pools, remote nodes smaller ones, and ignored nodes are never
/// connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeDistance {
    Local,
    Remote,
    Ignored,
}

impl_name_conversions!(NodeDistance {
    Local => "LOCAL",
    Remote => "REMOTE",
    Ignored => "IGNORED",
});
