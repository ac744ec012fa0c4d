//! Retry: what to do after an operation attempt failed
//!
//! The response-handling layer classifies a failure into a
//! [`RequestFailure`](crate::failure::RequestFailure) and asks the client's
//! [`RetryPolicy`] for a [`RetryDecision`]. Decision methods are pure: the
//! number of retries already made is passed in by the pipeline, never tracked
//! here.
//!
//! | Policy | Behavior |
//! |--------|----------|
//! | [`DefaultRetryPolicy`] | at most one retry, only where replay is known safe |
//! | [`DowngradingConsistencyRetryPolicy`] | retries at a lower consistency level |
//! | [`FallthroughRetryPolicy`] | never retries |
//! | [`LoggingRetryPolicy`] | wraps another policy and logs its retries |

pub mod decision;
pub mod default;
pub mod downgrading;
pub mod fallthrough;
pub mod logging;

use std::fmt;
use std::sync::Arc;

pub use decision::{RetryDecision, RetryTarget};
pub use default::DefaultRetryPolicy;
pub use downgrading::DowngradingConsistencyRetryPolicy;
pub use fallthrough::FallthroughRetryPolicy;
pub use logging::LoggingRetryPolicy;

use crate::consistency::{ConsistencyLevel, WriteType};
use crate::failure::{RequestErrorKind, RequestFailure};

/// Decides whether and how to retry a failed operation
///
/// `retry_count` is the number of retries already made for the operation.
pub trait RetryPolicy: Send + Sync + fmt::Debug {
    /// The coordinator timed out waiting for read replicas
    ///
    /// `block_for` replicas were required, `received` answered, and
    /// `data_retrieved` tells whether the replica asked for data replied.
    fn on_read_timeout(
        &self,
        consistency: ConsistencyLevel,
        block_for: u32,
        received: u32,
        data_retrieved: bool,
        retry_count: u32,
    ) -> RetryDecision;

    /// The coordinator timed out waiting for write acknowledgements
    fn on_write_timeout(
        &self,
        consistency: ConsistencyLevel,
        write_type: WriteType,
        block_for: u32,
        received: u32,
        retry_count: u32,
    ) -> RetryDecision;

    /// The coordinator knew too few replicas were alive to try at all
    fn on_unavailable(
        &self,
        consistency: ConsistencyLevel,
        required: u32,
        alive: u32,
        retry_count: u32,
    ) -> RetryDecision;

    /// The attempt against the chosen node failed at the connection or
    /// request level
    fn on_request_error(
        &self,
        kind: RequestErrorKind,
        idempotent: bool,
        retry_count: u32,
    ) -> RetryDecision;

    /// Dispatch a classified failure to the matching decision method
    fn on_failure(&self, failure: &RequestFailure, retry_count: u32) -> RetryDecision {
        match *failure {
            RequestFailure::ReadTimeout { consistency, block_for, received, data_retrieved } => {
                self.on_read_timeout(consistency, block_for, received, data_retrieved, retry_count)
            }
            RequestFailure::WriteTimeout { consistency, write_type, block_for, received } => {
                self.on_write_timeout(consistency, write_type, block_for, received, retry_count)
            }
            RequestFailure::Unavailable { consistency, required, alive } => {
                self.on_unavailable(consistency, required, alive, retry_count)
            }
            RequestFailure::Request { kind, idempotent } => {
                self.on_request_error(kind, idempotent, retry_count)
            }
        }
    }
}

impl<P: RetryPolicy + ?Sized> RetryPolicy for Arc<P> {
    fn on_read_timeout(
        &self,
        consistency: ConsistencyLevel,
        block_for: u32,
        received: u32,
        data_retrieved: bool,
        retry_count: u32,
    ) -> RetryDecision {
        (**self).on_read_timeout(consistency, block_for, received, data_retrieved, retry_count)
    }

    fn on_write_timeout(
        &self,
        consistency: ConsistencyLevel,
        write_type: WriteType,
        block_for: u32,
        received: u32,
        retry_count: u32,
    ) -> RetryDecision {
        (**self).on_write_timeout(consistency, write_type, block_for, received, retry_count)
    }

    fn on_unavailable(
        &self,
        consistency: ConsistencyLevel,
        required: u32,
        alive: u32,
        retry_count: u32,
    ) -> RetryDecision {
        (**self).on_unavailable(consistency, required, alive, retry_count)
    }

    fn on_request_error(
        &self,
        kind: RequestErrorKind,
        idempotent: bool,
        retry_count: u32,
    ) -> RetryDecision {
        (**self).on_request_error(kind, idempotent, retry_count)
    }
}
