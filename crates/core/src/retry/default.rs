//! Conservative default retry policy

use super::{RetryDecision, RetryPolicy};
use crate::consistency::{ConsistencyLevel, WriteType};
use crate::failure::RequestErrorKind;

/// Retries at most once, and only where a replay cannot change the outcome
///
/// - Read timeout: retry on the same host when at least `block_for`
///   replicas answered but the data replica did not.
/// - Write timeout: retry on the same host only for batch log writes.
/// - Unavailable: retry on the next host, since this coordinator already
///   counted too few live replicas.
/// - Request error: retry on the next host when the failure kind and the
///   idempotency flag make a replay safe.
///
/// The consistency level is never changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultRetryPolicy;

impl DefaultRetryPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl RetryPolicy for DefaultRetryPolicy {
    fn on_read_timeout(
        &self,
        _consistency: ConsistencyLevel,
        block_for: u32,
        received: u32,
        data_retrieved: bool,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count == 0 && received >= block_for && !data_retrieved {
            RetryDecision::retry_same_host(None)
        } else {
            RetryDecision::rethrow()
        }
    }

    fn on_write_timeout(
        &self,
        _consistency: ConsistencyLevel,
        write_type: WriteType,
        _block_for: u32,
        _received: u32,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count == 0 && write_type == WriteType::BatchLog {
            RetryDecision::retry_same_host(None)
        } else {
            RetryDecision::rethrow()
        }
    }

    fn on_unavailable(
        &self,
        _consistency: ConsistencyLevel,
        _required: u32,
        _alive: u32,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count == 0 {
            RetryDecision::retry_next_host(None)
        } else {
            RetryDecision::rethrow()
        }
    }

    fn on_request_error(
        &self,
        kind: RequestErrorKind,
        idempotent: bool,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count == 0 && kind.is_safe_to_replay(idempotent) {
            RetryDecision::retry_next_host(None)
        } else {
            RetryDecision::rethrow()
        }
    }
}
