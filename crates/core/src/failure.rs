//! Classified operation failures handed to retry policies
//!
//! The response-handling layer turns coordinator errors and connection
//! failures into a [`RequestFailure`]. Retry policies read it; they never see
//! raw protocol frames. When a policy answers RETHROW the pipeline returns the
//! same value to the caller unchanged.

use std::time::Duration;

use nodewise_common::error::{ErrorClassification, ErrorSeverity};
use nodewise_common::impl_name_conversions;
use thiserror::Error;

use crate::consistency::{ConsistencyLevel, WriteType};

/// Connection-level or coordinator-level failure category for
/// [`RequestFailure::Request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestErrorKind {
    /// The connection failed before the request was written; the node never
    /// saw the operation
    ConnectionNotSent,
    /// The connection dropped after the request was written; the outcome is
    /// unknown
    ConnectionLost,
    /// The node rejected the request because it is overloaded
    Overloaded,
    /// The node failed while processing the request
    ServerError,
    /// The request itself is invalid (syntax, unknown table, bad credentials)
    Invalid,
    /// Anything the response layer could not classify
    Other,
}

impl_name_conversions!(RequestErrorKind {
    ConnectionNotSent => "CONNECTION_NOT_SENT",
    ConnectionLost => "CONNECTION_LOST",
    Overloaded => "OVERLOADED",
    ServerError => "SERVER_ERROR",
    Invalid => "INVALID",
    Other => "OTHER",
});

impl RequestErrorKind {
    /// Whether replaying the operation elsewhere cannot duplicate its effect
    ///
    /// A request that was never written is always safe. A transient failure
    /// after the write is only safe for idempotent operations. Invalid and
    /// unclassified requests are never safe.
    pub fn is_safe_to_replay(self, idempotent: bool) -> bool {
        match self {
            Self::ConnectionNotSent => true,
            Self::ConnectionLost | Self::Overloaded | Self::ServerError => idempotent,
            Self::Invalid | Self::Other => false,
        }
    }
}

/// A failed operation attempt, classified by category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// Enough replicas did not answer a read in time
    #[error("Read timeout at {consistency} ({received} of {block_for} responses, data retrieved: {data_retrieved})")]
    ReadTimeout {
        consistency: ConsistencyLevel,
        block_for: u32,
        received: u32,
        data_retrieved: bool,
    },

    /// Enough replicas did not acknowledge a write in time
    #[error("Write timeout at {consistency} for {write_type} write ({received} of {block_for} acknowledgements)")]
    WriteTimeout {
        consistency: ConsistencyLevel,
        write_type: WriteType,
        block_for: u32,
        received: u32,
    },

    /// The coordinator knew up front that too few replicas were alive
    #[error("Not enough replicas for {consistency} ({alive} alive, {required} required)")]
    Unavailable { consistency: ConsistencyLevel, required: u32, alive: u32 },

    /// The attempt against one node failed before a coordinator answer
    #[error("Request error ({kind}, idempotent: {idempotent})")]
    Request { kind: RequestErrorKind, idempotent: bool },
}

impl RequestFailure {
    /// Short category name used in log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::ReadTimeout { .. } => "read_timeout",
            Self::WriteTimeout { .. } => "write_timeout",
            Self::Unavailable { .. } => "unavailable",
            Self::Request { .. } => "request_error",
        }
    }

    /// Consistency level the failed attempt ran at, if the coordinator
    /// reported one
    pub fn consistency(&self) -> Option<ConsistencyLevel> {
        match self {
            Self::ReadTimeout { consistency, .. }
            | Self::WriteTimeout { consistency, .. }
            | Self::Unavailable { consistency, .. } => Some(*consistency),
            Self::Request { .. } => None,
        }
    }
}

impl ErrorClassification for RequestFailure {
    fn is_retryable(&self) -> bool {
        match self {
            Self::ReadTimeout { .. } | Self::Unavailable { .. } => true,
            Self::WriteTimeout { write_type, .. } => *write_type == WriteType::BatchLog,
            Self::Request { kind, idempotent } => kind.is_safe_to_replay(*idempotent),
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Request { kind: RequestErrorKind::Invalid | RequestErrorKind::Other, .. } => {
                ErrorSeverity::Error
            }
            _ => ErrorSeverity::Warning,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}
