//! Retry decisions

use std::fmt;

use crate::consistency::ConsistencyLevel;

/// Which node a retry should be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryTarget {
    /// Retry on the node that just failed
    SameHost,
    /// Move on to the next node of the query plan
    NextHost,
}

/// Outcome of a retry policy for one failed attempt
///
/// Created fresh for each decision and acted on immediately by the execution
/// pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryDecision {
    /// Run the operation again
    Retry {
        /// Consistency level for the retry; `None` keeps the original one
        consistency: Option<ConsistencyLevel>,
        target: RetryTarget,
    },
    /// Surface the original failure to the caller unchanged
    Rethrow,
    /// Suppress the failure and treat the operation as an empty success
    Ignore,
}

impl RetryDecision {
    pub fn retry_same_host(consistency: Option<ConsistencyLevel>) -> Self {
        Self::Retry { consistency, target: RetryTarget::SameHost }
    }

    pub fn retry_next_host(consistency: Option<ConsistencyLevel>) -> Self {
        Self::Retry { consistency, target: RetryTarget::NextHost }
    }

    pub fn rethrow() -> Self {
        Self::Rethrow
    }

    pub fn ignore() -> Self {
        Self::Ignore
    }

    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry { .. })
    }

    /// Overridden consistency level of a retry
    pub fn consistency(&self) -> Option<ConsistencyLevel> {
        match self {
            Self::Retry { consistency, .. } => *consistency,
            Self::Rethrow | Self::Ignore => None,
        }
    }

    /// Whether a retry goes back to the node that just failed
    pub fn retry_current_host(&self) -> bool {
        matches!(self, Self::Retry { target: RetryTarget::SameHost, .. })
    }
}

impl fmt::Display for RetryDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retry { consistency, target } => {
                let host = match target {
                    RetryTarget::SameHost => "same host",
                    RetryTarget::NextHost => "next host",
                };
                match consistency {
                    Some(cl) => write!(f, "RETRY at {cl} on {host}"),
                    None => write!(f, "RETRY on {host}"),
                }
            }
            Self::Rethrow => f.write_str("RETHROW"),
            Self::Ignore => f.write_str("IGNORE"),
        }
    }
}
