//! Integration tests for `nodewise_common::error`.
//!
//! These suites validate classification and delegation from composed crate
//! errors so policy crates surface consistent failure semantics.

use std::time::Duration;

use nodewise_common::error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
use nodewise_common::{impl_error_classification, impl_error_conversion};
use thiserror::Error;

/// Validates that `CommonError` classification surfaces the expected
/// retryable, severity and criticality combinations for each variant.
///
/// Assertions:
/// - Confirms `err.is_retryable()` equals `retryable`.
/// - Confirms `err.severity()` equals `severity`.
/// - Confirms `err.is_critical()` equals `critical`.
#[test]
fn classification_matrix_matches_expected_contract() {
    let cases = vec![
        (CommonError::config("max_delay_ms", "below base delay"), false, ErrorSeverity::Error, false),
        (CommonError::config("local_dc", "must not be empty"), false, ErrorSeverity::Error, false),
        (CommonError::serialization("TOML", "invalid table"), false, ErrorSeverity::Error, false),
        (CommonError::serialization("JSON", "eof"), false, ErrorSeverity::Error, false),
    ];

    for (err, retryable, severity, critical) in cases {
        assert_eq!(err.is_retryable(), retryable, "retryable mismatch for {err}");
        assert_eq!(err.severity(), severity, "severity mismatch for {err}");
        assert_eq!(err.is_critical(), critical, "critical mismatch for {err}");
        assert_eq!(err.retry_after(), None);
    }
}

#[derive(Debug, Error)]
enum PlannerError {
    #[error("no datacenter named '{0}'")]
    UnknownDatacenter(String),

    #[error("planner overloaded")]
    Overloaded,

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl_error_conversion!(PlannerError, Common);
impl_error_classification!(PlannerError, Common,
    Self::UnknownDatacenter(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::Overloaded => {
        retryable: true,
        severity: ErrorSeverity::Warning,
        critical: false,
        retry_after: Some(Duration::from_millis(250)),
    }
);

fn parse_planner_settings(raw: &str) -> Result<toml::Value, PlannerError> {
    Ok(toml::from_str(raw)?)
}

/// Validates module errors that embed `CommonError` through the macros.
///
/// # Test Steps
/// 1. Classify a module-specific non-retryable variant
/// 2. Classify a module-specific retryable variant with a retry hint
/// 3. Convert a TOML parse failure through `?` and check delegation
#[test]
fn composed_errors_delegate_to_common_classification() {
    let unknown = PlannerError::UnknownDatacenter("dc9".to_string());
    assert!(!unknown.is_retryable());
    assert_eq!(unknown.severity(), ErrorSeverity::Error);
    assert_eq!(unknown.to_string(), "no datacenter named 'dc9'");

    let overloaded = PlannerError::Overloaded;
    assert!(overloaded.is_retryable());
    assert_eq!(overloaded.retry_after(), Some(Duration::from_millis(250)));

    let parse_failure = parse_planner_settings("local_dc = ").unwrap_err();
    match &parse_failure {
        PlannerError::Common(CommonError::Serialization { format, .. }) => {
            assert_eq!(*format, "TOML");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(parse_failure.severity(), ErrorSeverity::Error);
    assert!(!parse_failure.is_critical());
}

/// Validates that `CommonResult` composes with `?` in helper functions.
///
/// Assertions:
/// - Confirms the error raised inside the helper reaches the caller
///   unchanged.
#[test]
fn common_result_propagates_unchanged() {
    fn require_positive(field: &str, value: i64) -> CommonResult<u64> {
        if value <= 0 {
            return Err(CommonError::config(field, format!("must be positive, got {value}")));
        }
        Ok(value.unsigned_abs())
    }

    fn load(value: i64) -> CommonResult<u64> {
        let millis = require_positive("delay_ms", value)?;
        Ok(millis * 2)
    }

    assert_eq!(load(5), Ok(10));
    assert_eq!(
        load(-1),
        Err(CommonError::config("delay_ms", "must be positive, got -1"))
    );
}
