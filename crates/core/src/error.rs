//! Configuration errors raised while assembling policies
//!
//! Every variant here is fatal at construction time: a client context must
//! not be created from a policy set that failed validation.

use std::time::Duration;

use nodewise_common::error::{CommonError, ErrorSeverity};
use nodewise_common::{impl_error_classification, impl_error_conversion};
use thiserror::Error;

/// Errors produced while constructing or configuring policies
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error(transparent)]
    Common(#[from] CommonError),

    /// A policy bundle was assembled without one of its three policies
    #[error("Missing {policy} policy")]
    MissingPolicy { policy: &'static str },

    /// Reconnection delays violate `0 < base <= max`
    #[error("Invalid reconnection delay: base {base:?}, max {max:?} ({reason})")]
    InvalidDelay { base: Duration, max: Duration, reason: &'static str },
}

impl PolicyError {
    pub(crate) fn invalid_delay(base: Duration, max: Duration, reason: &'static str) -> Self {
        tracing::warn!(
            base_ms = saturating_millis(base),
            max_ms = saturating_millis(max),
            reason,
            "Rejected reconnection delay configuration"
        );
        Self::InvalidDelay { base, max, reason }
    }
}

fn saturating_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

impl_error_conversion!(PolicyError, Common);

impl_error_classification!(PolicyError, Common,
    Self::MissingPolicy { .. } => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::InvalidDelay { .. } => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    }
);

/// Result type for policy construction
pub type PolicyResult<T> = Result<T, PolicyError>;
