//! Common error types and utilities shared by the nodewise crates
//!
//! This module provides the error vocabulary every policy crate builds on. It
//! has three parts:
//!
//! 1. **`CommonError`**: the cross-cutting error patterns (rejected
//!    configuration values, serialization failures)
//!
//! 2. **`ErrorClassification` trait**: a standard interface for classifying
//!    errors by retryability, severity and criticality
//!
//! 3. **`ErrorSeverity` enum**: one severity scale for logging and alerting
//!
//! ## Composition
//!
//! Crate-specific errors embed `CommonError` instead of duplicating its
//! variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum PolicyError {
//!     #[error("Missing {policy} policy")]
//!     MissingPolicy { policy: &'static str },
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_classification!(PolicyError, Common,
//!     Self::MissingPolicy { .. } => {
//!         retryable: false,
//!         severity: ErrorSeverity::Error,
//!         critical: false,
//!     }
//! );
//! ```
//!
//! | Pattern | CommonError Variant | When to Use |
//! |---------|-------------------|-------------|
//! | **Configuration** | `Config` | A setting with a value that cannot be used |
//! | **Serialization** | `Serialization` | JSON/TOML parsing, encoding errors |

use std::fmt;
use std::time::Duration;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Common error variants that appear across crates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A configuration field holds an unusable value
    Config { field: String, message: String },

    /// Serialization or deserialization errors
    Serialization { format: &'static str, message: String },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { field, message } => {
                write!(f, "Configuration error in field '{}': {}", field, message)
            }
            Self::Serialization { format, message } => {
                write!(f, "Serialization error ({}): {}", format, message)
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    /// Create a configuration error for a specific field
    pub fn config<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Config { field: field.into(), message: message.into() }
    }

    /// Create a serialization error for the named format
    pub fn serialization(format: &'static str, message: impl Into<String>) -> Self {
        Self::Serialization { format, message: message.into() }
    }
}

/// Error classification trait for consistent error handling across crates
///
/// Execution pipelines use this to decide whether a failure is worth another
/// attempt and how loudly to report it.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient conditions that may succeed if
    /// attempted again, such as timeouts or a coordinator that could not
    /// reach enough replicas.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("JSON", err.to_string())
    }
}

impl From<toml::de::Error> for CommonError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization("TOML", err.to_string())
    }
}

impl From<toml::ser::Error> for CommonError {
    fn from(err: toml::ser::Error) -> Self {
        Self::serialization("TOML", err.to_string())
    }
}

/// Utility macro for routing serde format errors through `CommonError`
///
/// ```rust,ignore
/// #[derive(Debug, thiserror::Error)]
/// pub enum PolicyError {
///     #[error(transparent)]
///     Common(#[from] CommonError),
/// }
///
/// impl_error_conversion!(PolicyError, Common);
/// ```
///
/// This generates `From<serde_json::Error>`, `From<toml::de::Error>` and
/// `From<toml::ser::Error>` for `PolicyError`; the variant itself carries
/// `#[from] CommonError`.
#[macro_export]
macro_rules! impl_error_conversion {
    ($error_type:ty, $variant:ident) => {
        impl From<serde_json::Error> for $error_type {
            fn from(err: serde_json::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }

        impl From<toml::de::Error> for $error_type {
            fn from(err: toml::de::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }

        impl From<toml::ser::Error> for $error_type {
            fn from(err: toml::ser::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }
    };

}

/// Macro to implement ErrorClassification by delegating to CommonError
///
/// ```rust,ignore
/// impl_error_classification!(PolicyError, Common,
///     Self::MissingPolicy { .. } => {
///         retryable: false,
///         severity: ErrorSeverity::Error,
///         critical: false,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(, retry_after: $retry_after:expr)?
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_retryable(e),
                    $(
                        $variant => $retryable,
                    )*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $(
                        $variant => $severity,
                    )*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_critical(e),
                    $(
                        $variant => $critical,
                    )*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::retry_after(e),
                    $(
                        $(
                            $variant => $retry_after,
                        )?
                    )*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    //! Unit tests for error handling functionality
    //!
    //! Tests cover the variants, display formatting, severity levels and the
    //! conversion/classification macros.

    use thiserror::Error;

    use super::*;

    /// Validates `CommonError::config` behavior for a rejected field.
    ///
    /// Assertions:
    /// - Confirms the message names the field.
    /// - Ensures `!err.is_retryable()` evaluates to true.
    /// - Ensures `!err.is_critical()` evaluates to true.
    /// - Confirms `err.severity()` equals `ErrorSeverity::Error`.
    #[test]
    fn test_error_config_field() {
        let err = CommonError::config("local_dc", "must not be empty");
        assert_eq!(err.to_string(), "Configuration error in field 'local_dc': must not be empty");
        assert!(!err.is_retryable());
        assert!(!err.is_critical());
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.retry_after(), None);
    }

    /// Validates `From<toml::de::Error>` behavior for the toml conversion
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures the converted error is a TOML serialization error.
    #[test]
    fn test_from_toml_error() {
        let parse: Result<toml::Value, _> = toml::from_str("key = ");
        let err = CommonError::from(parse.unwrap_err());
        assert!(matches!(err, CommonError::Serialization { format: "TOML", .. }));
        assert!(err.to_string().starts_with("Serialization error (TOML): "));
    }

    /// Validates `ErrorSeverity` ordering and display.
    ///
    /// Assertions:
    /// - Ensures `Info < Warning < Error < Critical`.
    /// - Confirms `ErrorSeverity::Warning.to_string()` equals `"WARN"`.
    #[test]
    fn test_severity_ordering() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }

    #[derive(Debug, Error)]
    enum WidgetError {
        #[error("widget missing")]
        Missing,
        #[error(transparent)]
        Common(#[from] CommonError),
    }

    crate::impl_error_conversion!(WidgetError, Common);
    crate::impl_error_classification!(WidgetError, Common,
        Self::Missing => {
            retryable: true,
            severity: ErrorSeverity::Warning,
            critical: false,
            retry_after: Some(Duration::from_millis(5)),
        }
    );

    /// Validates the conversion and classification macros for a composed
    /// error type.
    ///
    /// Assertions:
    /// - Confirms module-specific variants use the declared classification.
    /// - Confirms embedded `CommonError` values delegate classification.
    /// - Confirms `serde_json::Error` converts into the `Common` variant.
    #[test]
    fn test_macros_compose_with_common_error() {
        let missing = WidgetError::Missing;
        assert!(missing.is_retryable());
        assert_eq!(missing.severity(), ErrorSeverity::Warning);
        assert_eq!(missing.retry_after(), Some(Duration::from_millis(5)));

        let common = WidgetError::from(CommonError::config("size", "too large"));
        assert!(!common.is_retryable());
        assert_eq!(common.severity(), ErrorSeverity::Error);
        assert_eq!(common.retry_after(), None);

        let json: Result<serde_json::Value, _> = serde_json::from_str("{");
        let converted = WidgetError::from(json.unwrap_err());
        assert!(matches!(converted, WidgetError::Common(CommonError::Serialization { .. })));
    }
}
