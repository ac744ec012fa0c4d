//! Common utility functions and helper macros
//!
//! - **[`macros`]**: declarative macros for enum name conversions
//! - **[`serde`]**: serialization helpers for configuration types

#[macro_use]
pub mod macros;
pub mod serde;

pub use self::serde::duration_millis;
