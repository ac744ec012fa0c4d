//! Never retry

use super::{RetryDecision, RetryPolicy};
use crate::consistency::{ConsistencyLevel, WriteType};
use crate::failure::RequestErrorKind;

/// Rethrows every failure, leaving retries to the application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallthroughRetryPolicy;

impl FallthroughRetryPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl RetryPolicy for FallthroughRetryPolicy {
    fn on_read_timeout(&self, _: ConsistencyLevel, _: u32, _: u32, _: bool, _: u32) -> RetryDecision {
        RetryDecision::rethrow()
    }

    fn on_write_timeout(
        &self,
        _: ConsistencyLevel,
        _: WriteType,
        _: u32,
        _: u32,
        _: u32,
    ) -> RetryDecision {
        RetryDecision::rethrow()
    }

    fn on_unavailable(&self, _: ConsistencyLevel, _: u32, _: u32, _: u32) -> RetryDecision {
        RetryDecision::rethrow()
    }

    fn on_request_error(&self, _: RequestErrorKind, _: bool, _: u32) -> RetryDecision {
        RetryDecision::rethrow()
    }
}
