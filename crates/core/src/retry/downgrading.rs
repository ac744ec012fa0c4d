//! Retry at a lower consistency level

use super::{DefaultRetryPolicy, RetryDecision, RetryPolicy};
use crate::consistency::{ConsistencyLevel, WriteType};
use crate::failure::RequestErrorKind;

/// Trades consistency for availability by retrying at the highest level the
/// coordinator reported as reachable
///
/// A successful downgraded read may return stale data and a downgraded write
/// may be acknowledged by fewer replicas than requested; use this policy only
/// when that is acceptable.
///
/// Read and write timeouts are retried on the same coordinator. Unavailable
/// errors move to the next host, since this coordinator already counted too
/// few live replicas for the original level.
///
/// Every category is retried at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DowngradingConsistencyRetryPolicy;

impl DowngradingConsistencyRetryPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Highest level `known_ok` replicas can satisfy, if any
    fn max_likely_to_work(known_ok: u32, current: ConsistencyLevel) -> Option<ConsistencyLevel> {
        match known_ok {
            3.. => Some(ConsistencyLevel::Three),
            2 => Some(ConsistencyLevel::Two),
            1 => Some(ConsistencyLevel::One),
            // EACH_QUORUM reports counts for one datacenter only; others may still answer
            0 if current == ConsistencyLevel::EachQuorum => Some(ConsistencyLevel::One),
            0 => None,
        }
    }

    fn downgrade_same_host(known_ok: u32, current: ConsistencyLevel) -> RetryDecision {
        Self::max_likely_to_work(known_ok, current)
            .map_or_else(RetryDecision::rethrow, |cl| RetryDecision::retry_same_host(Some(cl)))
    }
}

impl RetryPolicy for DowngradingConsistencyRetryPolicy {
    fn on_read_timeout(
        &self,
        consistency: ConsistencyLevel,
        block_for: u32,
        received: u32,
        data_retrieved: bool,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count > 0 || consistency.is_serial() {
            return RetryDecision::rethrow();
        }
        if received < block_for {
            return Self::downgrade_same_host(received, consistency);
        }
        if data_retrieved {
            RetryDecision::rethrow()
        } else {
            RetryDecision::retry_same_host(Some(consistency))
        }
    }

    fn on_write_timeout(
        &self,
        consistency: ConsistencyLevel,
        write_type: WriteType,
        _block_for: u32,
        received: u32,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count > 0 {
            return RetryDecision::rethrow();
        }
        match write_type {
            // at least one replica has the write; hinted handoff delivers the rest
            WriteType::Simple | WriteType::Batch if received > 0 => RetryDecision::ignore(),
            WriteType::UnloggedBatch => Self::downgrade_same_host(received, consistency),
            WriteType::BatchLog => RetryDecision::retry_same_host(Some(consistency)),
            _ => RetryDecision::rethrow(),
        }
    }

    fn on_unavailable(
        &self,
        consistency: ConsistencyLevel,
        _required: u32,
        alive: u32,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count > 0 {
            return RetryDecision::rethrow();
        }
        if consistency.is_serial() {
            return RetryDecision::retry_next_host(None);
        }
        Self::max_likely_to_work(alive, consistency)
            .map_or_else(RetryDecision::rethrow, |cl| RetryDecision::retry_next_host(Some(cl)))
    }

    fn on_request_error(
        &self,
        kind: RequestErrorKind,
        idempotent: bool,
        retry_count: u32,
    ) -> RetryDecision {
        DefaultRetryPolicy.on_request_error(kind, idempotent, retry_count)
    }
}
