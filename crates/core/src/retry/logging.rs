//! Decision logging wrapper

use tracing::info;

use super::{RetryDecision, RetryPolicy};
use crate::consistency::{ConsistencyLevel, WriteType};
use crate::failure::RequestErrorKind;

/// Delegates to `P` and logs every decision other than RETHROW
///
/// Rethrown failures reach the caller anyway, so only the decisions that hide
/// a failure from the caller (retries and ignores) are logged.
#[derive(Debug, Clone)]
pub struct LoggingRetryPolicy<P> {
    inner: P,
}

impl<P: RetryPolicy> LoggingRetryPolicy<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: RetryPolicy> RetryPolicy for LoggingRetryPolicy<P> {
    fn on_read_timeout(
        &self,
        consistency: ConsistencyLevel,
        block_for: u32,
        received: u32,
        data_retrieved: bool,
        retry_count: u32,
    ) -> RetryDecision {
        let decision =
            self.inner.on_read_timeout(consistency, block_for, received, data_retrieved, retry_count);
        if decision != RetryDecision::Rethrow {
            info!(
                decision = %decision,
                consistency = %consistency,
                block_for,
                received,
                data_retrieved,
                retry_count,
                "Retry policy handled read timeout"
            );
        }
        decision
    }

    fn on_write_timeout(
        &self,
        consistency: ConsistencyLevel,
        write_type: WriteType,
        block_for: u32,
        received: u32,
        retry_count: u32,
    ) -> RetryDecision {
        let decision =
            self.inner.on_write_timeout(consistency, write_type, block_for, received, retry_count);
        if decision != RetryDecision::Rethrow {
            info!(
                decision = %decision,
                consistency = %consistency,
                write_type = %write_type,
                block_for,
                received,
                retry_count,
                "Retry policy handled write timeout"
            );
        }
        decision
    }

    fn on_unavailable(
        &self,
        consistency: ConsistencyLevel,
        required: u32,
        alive: u32,
        retry_count: u32,
    ) -> RetryDecision {
        let decision = self.inner.on_unavailable(consistency, required, alive, retry_count);
        if decision != RetryDecision::Rethrow {
            info!(
                decision = %decision,
                consistency = %consistency,
                required,
                alive,
                retry_count,
                "Retry policy handled unavailable replicas"
            );
        }
        decision
    }

    fn on_request_error(
        &self,
        kind: RequestErrorKind,
        idempotent: bool,
        retry_count: u32,
    ) -> RetryDecision {
        let decision = self.inner.on_request_error(kind, idempotent, retry_count);
        if decision != RetryDecision::Rethrow {
            info!(
                decision = %decision,
                kind = %kind,
                idempotent,
                retry_count,
                "Retry policy handled request error"
            );
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{DefaultRetryPolicy, DowngradingConsistencyRetryPolicy};

    /// Validates that the wrapper never changes a decision.
    ///
    /// Assertions:
    /// - Confirms wrapped and unwrapped policies agree on every category.
    #[test]
    fn test_decisions_pass_through() {
        let inner = DowngradingConsistencyRetryPolicy::new();
        let logging = LoggingRetryPolicy::new(inner);
        let cl = ConsistencyLevel::Quorum;

        for retry_count in 0..2 {
            assert_eq!(
                logging.on_read_timeout(cl, 3, 1, false, retry_count),
                inner.on_read_timeout(cl, 3, 1, false, retry_count)
            );
            assert_eq!(
                logging.on_write_timeout(cl, WriteType::Simple, 3, 1, retry_count),
                inner.on_write_timeout(cl, WriteType::Simple, 3, 1, retry_count)
            );
            assert_eq!(
                logging.on_unavailable(cl, 3, 2, retry_count),
                inner.on_unavailable(cl, 3, 2, retry_count)
            );
            assert_eq!(
                logging.on_request_error(RequestErrorKind::Overloaded, true, retry_count),
                inner.on_request_error(RequestErrorKind::Overloaded, true, retry_count)
            );
        }
    }

    /// Validates logging under an installed subscriber.
    ///
    /// Assertions:
    /// - Confirms logging a retry does not disturb the decision.
    #[test]
    fn test_logs_with_subscriber() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let policy = LoggingRetryPolicy::new(DefaultRetryPolicy::new());
            let decision = policy.on_unavailable(ConsistencyLevel::One, 1, 0, 0);
            assert_eq!(decision, RetryDecision::retry_next_host(None));
            assert_eq!(policy.inner(), &DefaultRetryPolicy::new());
        });
    }
}
