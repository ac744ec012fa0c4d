//! Foundation utilities shared across nodewise crates.
//!
//! # Feature Tiers
//!
//! - `foundation` (default): errors, error classification, serde helpers and
//!   enum name macros

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
#[macro_use]
pub mod utils;

#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "foundation")]
pub use utils::serde::duration_millis;
