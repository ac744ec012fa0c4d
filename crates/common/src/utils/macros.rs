//! Macros for reducing boilerplate code

/// Implements Display and FromStr for C-like enums with canonical names
///
/// This macro generates:
/// - `Display`: writes the canonical name exactly as given
/// - `FromStr`: parses the canonical name case-insensitively
///
/// # Example
///
/// ```rust
/// use std::str::FromStr;
///
/// use nodewise_common::impl_name_conversions;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// pub enum Distance {
///     Local,
///     Remote,
/// }
///
/// impl_name_conversions!(Distance {
///     Local => "LOCAL",
///     Remote => "REMOTE",
/// });
///
/// assert_eq!(Distance::Local.to_string(), "LOCAL");
/// assert_eq!(Distance::from_str("remote"), Ok(Distance::Remote));
/// ```
#[macro_export]
macro_rules! impl_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
