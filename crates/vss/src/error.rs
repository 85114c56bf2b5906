//! Error types for style resolution and theme management.
//!
//! Only registry-identity problems ([`StyleError::ThemeNotFound`]) and theme file
//! problems reach callers in the default configuration. Malformed style values are
//! degraded to safe defaults unless strict mode is enabled, and unresolved theme
//! tokens are never an error.

use thiserror::Error;

/// Errors that can occur while resolving styles or managing themes.
///
/// # Examples
///
/// ```rust
/// use vss::{StyleError, ThemeRegistry};
///
/// let mut registry = ThemeRegistry::new();
/// let err = registry.activate("missing").unwrap_err();
/// assert!(matches!(err, StyleError::ThemeNotFound { .. }));
/// ```
#[derive(Error, Debug)]
pub enum StyleError {
    /// A theme name was activated or derived from without being registered.
    #[error("Theme not found: {name}")]
    ThemeNotFound { name: String },

    /// A property value could not be coerced to the shape it requires.
    ///
    /// Only produced in strict mode.
    #[error("Malformed value for '{property}': {value} (expected {expected})")]
    MalformedStyleValue {
        property: String,
        value: String,
        expected: &'static str,
    },

    /// Theme data failed validation on import.
    #[error("Invalid theme '{name}': {reason}")]
    InvalidTheme { name: String, reason: String },

    /// A theme file extension that is neither JSON nor TOML.
    #[error("Unsupported theme format: {0}")]
    UnsupportedFormat(String),

    /// The shared registry was already borrowed when a theme switch was requested.
    #[error("Theme registry is busy")]
    RegistryBusy,

    #[error("JSON error in theme data")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error in theme data")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error")]
    TomlSer(#[from] toml::ser::Error),

    /// An I/O error occurred while reading or writing a theme file.
    #[error("I/O error reading theme")]
    Io(#[from] std::io::Error),
}

impl StyleError {
    pub fn theme_not_found(name: impl Into<String>) -> Self {
        Self::ThemeNotFound { name: name.into() }
    }

    pub fn malformed(
        property: impl Into<String>,
        value: impl std::fmt::Display,
        expected: &'static str,
    ) -> Self {
        Self::MalformedStyleValue {
            property: property.into(),
            value: value.to_string(),
            expected,
        }
    }

    pub fn invalid_theme(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTheme {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the style engine.
pub type StyleResult<T> = Result<T, StyleError>;
