//! # Nodewise Core
//!
//! Resilience policies for clients of a multi-node cluster.
//!
//! This crate answers three questions for the execution pipeline:
//! - which node to contact next ([`load_balancing`])
//! - how long to wait before reconnecting to a down node ([`reconnection`])
//! - whether to retry a failed operation, and how ([`retry`])
//!
//! A [`Policies`] bundle binds one policy of each kind to a client. Every
//! decision here is a synchronous, non-blocking computation: the crate does
//! no I/O, spawns nothing, and never sleeps.
//!
//! ## Architecture Principles
//! - Only depends on `nodewise-common`
//! - Node membership and failure classification come from the caller
//! - Policies are shared trait objects, safe to call concurrently

pub mod config;
pub mod consistency;
pub mod error;
pub mod failure;
pub mod load_balancing;
pub mod node;
pub mod policies;
pub mod reconnection;
pub mod retry;

pub use config::PoliciesConfig;
pub use consistency::{ConsistencyLevel, WriteType};
pub use error::{PolicyError, PolicyResult};
pub use failure::{RequestErrorKind, RequestFailure};
pub use load_balancing::{
    DcAwareRoundRobinPolicy, LoadBalancingPolicy, QueryHint, QueryPlan, RoundRobinPolicy,
};
pub use node::{NodeDistance, NodeView};
pub use policies::{Policies, PoliciesBuilder};
pub use reconnection::{
    ConstantReconnectionPolicy, ExponentialReconnectionPolicy, ReconnectionPolicy,
    ReconnectionSchedule,
};
pub use retry::{
    DefaultRetryPolicy, DowngradingConsistencyRetryPolicy, FallthroughRetryPolicy,
    LoggingRetryPolicy, RetryDecision, RetryPolicy, RetryTarget,
};
