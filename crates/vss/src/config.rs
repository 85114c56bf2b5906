//! # Theme Configuration
//!
//! Selects the startup theme and resolver behaviour from a TOML file, environment
//! variables, or code.
//!
//! ## Overview
//!
//! - **[ThemeConfig]**: which theme to activate, what to fall back to, which extra
//!   theme files to load, and how strict the cascade is
//! - **Environment overrides**: `VENEER_*` variables win over the file
//! - **[ThemeConfig::apply]**: loads the files into a registry and activates the theme
//!
//! ## Environment Variables
//!
//! ```bash
//! export VENEER_THEME=dark              # theme to activate
//! export VENEER_THEME_FALLBACK=default  # used if VENEER_THEME is unknown
//! export VENEER_STRICT=1                # malformed values become errors
//! export VENEER_CONFIG=~/.config/veneer/theme.toml
//! ```
//!
//! ## TOML Format
//!
//! ```toml
//! theme = "ocean"
//! fallback = "default"
//! strict = false
//! color_cache = true
//! theme_files = ["themes/ocean.json"]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use vss::{ThemeConfig, ThemeRegistry};
//!
//! let config = ThemeConfig::from_toml_str(r#"
//!     theme = "missing"
//!     fallback = "dark"
//! "#).unwrap();
//!
//! let mut registry = ThemeRegistry::with_builtin_themes();
//! let active = config.apply(&mut registry).unwrap();
//! assert_eq!(active.name(), "dark");
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cascade::ResolverOptions;
use crate::error::{StyleError, StyleResult};
use crate::registry::ThemeRegistry;
use crate::theme::Theme;

pub const ENV_THEME: &str = "VENEER_THEME";
pub const ENV_THEME_FALLBACK: &str = "VENEER_THEME_FALLBACK";
pub const ENV_STRICT: &str = "VENEER_STRICT";
pub const ENV_CONFIG: &str = "VENEER_CONFIG";

/// Startup theme selection and resolver switches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme to activate.
    pub theme: String,
    /// Theme to activate when `theme` is not registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    pub strict: bool,
    pub color_cache: bool,
    /// Extra `.json`/`.toml` theme files registered before activation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub theme_files: Vec<PathBuf>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            fallback: None,
            strict: false,
            color_cache: true,
            theme_files: Vec::new(),
        }
    }
}

impl ThemeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `VENEER_CONFIG` (if set) and then applies the other `VENEER_*`
    /// overrides. An unreadable config file is logged and ignored.
    pub fn from_env_or_default() -> Self {
        let base = match env::var(ENV_CONFIG) {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|err| {
                log::warn!("Ignoring theme config '{}': {}", path, err);
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| env::var(key).ok())
    }

    /// Applies `VENEER_THEME`, `VENEER_THEME_FALLBACK` and `VENEER_STRICT` as
    /// reported by `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(theme) = lookup(ENV_THEME).filter(|t| !t.trim().is_empty()) {
            self.theme = theme.trim().to_string();
        }
        if let Some(fallback) = lookup(ENV_THEME_FALLBACK).filter(|t| !t.trim().is_empty()) {
            self.fallback = Some(fallback.trim().to_string());
        }
        if let Some(strict) = lookup(ENV_STRICT) {
            self.strict = matches!(strict.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> StyleResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> StyleResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> StyleResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_theme_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.theme_files.push(path.into());
        self
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            strict: self.strict,
            color_cache: self.color_cache,
        }
    }

    /// Registers the configured theme files and activates the configured theme,
    /// or the fallback if the theme is unknown.
    pub fn apply(&self, registry: &mut ThemeRegistry) -> StyleResult<Arc<Theme>> {
        for path in &self.theme_files {
            let name = registry.load_file(path)?;
            log::debug!("Loaded theme '{}' from {}", name, path.display());
        }

        match registry.activate(&self.theme) {
            Ok(theme) => Ok(theme),
            Err(StyleError::ThemeNotFound { name }) => match &self.fallback {
                Some(fallback) => {
                    log::warn!("Theme '{}' not found, falling back to '{}'", name, fallback);
                    registry.activate(fallback)
                }
                None => Err(StyleError::ThemeNotFound { name }),
            },
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        assert_eq!(ThemeConfig::from_toml_str("").unwrap(), ThemeConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ThemeConfig::new().with_overrides(|key| match key {
            ENV_THEME => Some("dark".to_string()),
            ENV_STRICT => Some("true".to_string()),
            _ => None,
        });
        assert_eq!(config.theme, "dark");
        assert!(config.strict);
        assert_eq!(config.fallback, None);
    }

    #[test]
    fn test_unknown_theme_without_fallback() {
        let mut registry = ThemeRegistry::with_builtin_themes();
        let err = ThemeConfig::new().with_theme("nope").apply(&mut registry).unwrap_err();
        assert!(matches!(err, StyleError::ThemeNotFound { .. }));
        assert_eq!(registry.current_name(), Some("default"));
    }
}
