//! Theme definitions and the theme file format.
//!
//! A [`Theme`] bundles a colour palette, a font palette, a spacing scale, per-widget
//! default styles and any number of extra sections (`borders`, `shadows`,
//! `elevation`, ...). Widget styles may reference any of these through
//! `@section.key` tokens, which the cascade expands at resolution time.
//!
//! Themes are immutable once shared. Every constructed or modified theme receives a
//! fresh [`ThemeId`], which is what colour caches key on.
//!
//! ## File format
//!
//! ```json
//! {
//!   "name": "ocean",
//!   "colors": { "primary": "#006994", "background": "#f0f8ff" },
//!   "fonts": { "default": ["Segoe UI", 9, "normal"] },
//!   "spacing": { "sm": 4, "md": 8 },
//!   "borders": { "radius": 6 },
//!   "widgets": {
//!     "button": { "bg": "@colors.primary", "radius": "@borders.radius" }
//!   }
//! }
//! ```
//!
//! The same tree is accepted as TOML.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{StyleError, StyleResult};
use crate::value::{Font, StyleMap, StyleValue};

static NEXT_THEME_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one theme value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThemeId(u64);

impl ThemeId {
    fn next() -> Self {
        ThemeId(NEXT_THEME_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Serializable theme tree, the import/export shape of a [`Theme`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dark: bool,
    #[serde(default)]
    pub colors: IndexMap<String, String>,
    #[serde(default)]
    pub fonts: IndexMap<String, Font>,
    #[serde(default)]
    pub spacing: IndexMap<String, f64>,
    #[serde(default)]
    pub widgets: IndexMap<String, StyleMap>,
    /// Any other top-level section (`borders`, `shadows`, `elevation`, ...).
    #[serde(flatten)]
    pub sections: IndexMap<String, StyleValue>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ThemeData {
    /// Checks the structural requirements for importing a theme.
    pub fn validate(&self) -> StyleResult<()> {
        if self.name.trim().is_empty() {
            return Err(StyleError::invalid_theme(&self.name, "theme name is empty"));
        }
        for (key, value) in &self.colors {
            if let Err(err) = Color::check_literal(value) {
                return Err(StyleError::invalid_theme(
                    &self.name,
                    format!("color '{}' is not a valid color ({})", key, err),
                ));
            }
        }
        for (key, font) in &self.fonts {
            if font.size <= 0.0 {
                return Err(StyleError::invalid_theme(
                    &self.name,
                    format!("font '{}' has non-positive size {}", key, font.size),
                ));
            }
        }
        Ok(())
    }
}

/// On-disk theme encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeFormat {
    Json,
    Toml,
}

impl ThemeFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> StyleResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("json") => Ok(ThemeFormat::Json),
            Some("toml") => Ok(ThemeFormat::Toml),
            other => Err(StyleError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// A named bundle of palette, fonts, spacing and widget defaults.
#[derive(Clone, Debug)]
pub struct Theme {
    id: ThemeId,
    name: String,
    version: Option<String>,
    dark: bool,
    colors: IndexMap<String, String>,
    fonts: IndexMap<String, Font>,
    spacing: IndexMap<String, f64>,
    widgets: IndexMap<String, StyleMap>,
    sections: IndexMap<String, StyleValue>,
}

impl PartialEq for Theme {
    /// Structural equality; identities are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.dark == other.dark
            && self.colors == other.colors
            && self.fonts == other.fonts
            && self.spacing == other.spacing
            && self.widgets == other.widgets
            && self.sections == other.sections
    }
}

impl Theme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ThemeId::next(),
            name: name.into(),
            version: None,
            dark: false,
            colors: IndexMap::new(),
            fonts: IndexMap::new(),
            spacing: IndexMap::new(),
            widgets: IndexMap::new(),
            sections: IndexMap::new(),
        }
    }

    fn touched(mut self) -> Self {
        self.id = ThemeId::next();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.touched()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self.touched()
    }

    pub fn with_dark(mut self, dark: bool) -> Self {
        self.dark = dark;
        self.touched()
    }

    pub fn with_color(mut self, name: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(name.into(), color.into());
        self.touched()
    }

    pub fn with_font(mut self, name: impl Into<String>, font: Font) -> Self {
        self.fonts.insert(name.into(), font);
        self.touched()
    }

    pub fn with_spacing(mut self, name: impl Into<String>, value: f64) -> Self {
        self.spacing.insert(name.into(), value);
        self.touched()
    }

    /// Sets the default style for a widget type. Use `"*"` for the theme-wide
    /// defaults every widget receives.
    pub fn with_widget_style(mut self, widget: &str, style: StyleMap) -> Self {
        self.widgets.insert(widget.to_lowercase(), style.to_plain());
        self.touched()
    }

    pub fn with_section(mut self, name: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        let value: StyleValue = value.into();
        self.sections.insert(name.into(), value.to_plain());
        self.touched()
    }

    pub fn id(&self) -> ThemeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn colors(&self) -> &IndexMap<String, String> {
        &self.colors
    }

    pub fn fonts(&self) -> &IndexMap<String, Font> {
        &self.fonts
    }

    pub fn spacing(&self) -> &IndexMap<String, f64> {
        &self.spacing
    }

    pub fn widgets(&self) -> &IndexMap<String, StyleMap> {
        &self.widgets
    }

    pub fn sections(&self) -> &IndexMap<String, StyleValue> {
        &self.sections
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    pub fn font(&self, name: &str) -> Option<&Font> {
        self.fonts.get(name)
    }

    pub fn spacing_value(&self, name: &str) -> Option<f64> {
        self.spacing.get(name).copied()
    }

    /// The theme's style for a widget type (matched case-insensitively).
    pub fn widget_style(&self, widget: &str) -> Option<&StyleMap> {
        self.widgets
            .get(widget)
            .or_else(|| self.widgets.get(&widget.to_lowercase()))
    }

    /// Dot-path lookup through the whole theme tree, e.g. `colors.primary`,
    /// `fonts.heading.size`, `widgets.button.padding.0`, `shadows.small.blur`.
    pub fn lookup(&self, path: &str) -> Option<StyleValue> {
        let mut segments = path.split('.').filter(|s| !s.is_empty());
        let section = segments.next()?;
        let mut current = match section {
            "name" => StyleValue::Str(self.name.clone()),
            "version" => StyleValue::Str(self.version.clone()?),
            "dark" => StyleValue::Bool(self.dark),
            "colors" => match segments.next() {
                Some(key) => StyleValue::Str(self.colors.get(key)?.clone()),
                None => StyleValue::Map(
                    self.colors.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                ),
            },
            "fonts" => match segments.next() {
                Some(key) => StyleValue::Font(self.fonts.get(key)?.clone()),
                None => StyleValue::Map(
                    self.fonts.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                ),
            },
            "spacing" => match segments.next() {
                Some(key) => StyleValue::Number(*self.spacing.get(key)?),
                None => StyleValue::Map(self.spacing.iter().map(|(k, v)| (k.clone(), *v)).collect()),
            },
            "widgets" => match segments.next() {
                Some(key) => StyleValue::Map(self.widget_style(key)?.clone()),
                None => StyleValue::Map(
                    self.widgets.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                ),
            },
            other => self.sections.get(other)?.clone(),
        };
        for segment in segments {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Resolves an `@section.key` reference. Returns `None` for anything that is
    /// not a token or does not resolve.
    pub fn token(&self, reference: &str) -> Option<StyleValue> {
        let path = reference.strip_prefix('@')?;
        if !path.contains('.') {
            return None;
        }
        self.lookup(path)
    }

    pub fn from_data(data: ThemeData) -> Self {
        Self {
            id: ThemeId::next(),
            name: data.name,
            version: data.version,
            dark: data.dark,
            colors: data.colors,
            fonts: data.fonts,
            spacing: data.spacing,
            widgets: data
                .widgets
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_plain()))
                .collect(),
            sections: data
                .sections
                .into_iter()
                .map(|(k, v)| (k, v.to_plain()))
                .collect(),
        }
    }

    pub fn to_data(&self) -> ThemeData {
        ThemeData {
            name: self.name.clone(),
            version: self.version.clone(),
            dark: self.dark,
            colors: self.colors.clone(),
            fonts: self.fonts.clone(),
            spacing: self.spacing.clone(),
            widgets: self.widgets.clone(),
            sections: self.sections.clone(),
        }
    }

    /// Parses theme text in the given format.
    pub fn parse(text: &str, format: ThemeFormat) -> StyleResult<Self> {
        let data: ThemeData = match format {
            ThemeFormat::Json => serde_json::from_str(text)?,
            ThemeFormat::Toml => toml::from_str(text)?,
        };
        data.validate()?;
        Ok(Self::from_data(data))
    }

    /// Serializes the theme in the given format.
    pub fn render(&self, format: ThemeFormat) -> StyleResult<String> {
        let data = self.to_data();
        Ok(match format {
            ThemeFormat::Json => serde_json::to_string_pretty(&data)?,
            ThemeFormat::Toml => toml::to_string_pretty(&data)?,
        })
    }

    pub fn from_json_str(text: &str) -> StyleResult<Self> {
        Self::parse(text, ThemeFormat::Json)
    }

    pub fn from_toml_str(text: &str) -> StyleResult<Self> {
        Self::parse(text, ThemeFormat::Toml)
    }

    pub fn to_json_string(&self) -> StyleResult<String> {
        self.render(ThemeFormat::Json)
    }

    pub fn to_toml_string(&self) -> StyleResult<String> {
        self.render(ThemeFormat::Toml)
    }

    /// Reads a `.json` or `.toml` theme file.
    pub fn load(path: impl AsRef<Path>) -> StyleResult<Self> {
        let path = path.as_ref();
        let format = ThemeFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, format)
    }

    /// Writes the theme to a `.json` or `.toml` file.
    pub fn save(&self, path: impl AsRef<Path>) -> StyleResult<()> {
        let path = path.as_ref();
        let text = self.render(ThemeFormat::from_path(path)?)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Async variant of [`load`](Self::load).
    pub async fn load_async(path: impl AsRef<Path>) -> StyleResult<Self> {
        let path = path.as_ref();
        let format = ThemeFormat::from_path(path)?;
        let text = tokio::fs::read_to_string(path).await?;
        Self::parse(&text, format)
    }

    /// Async variant of [`save`](Self::save).
    pub async fn save_async(&self, path: impl AsRef<Path>) -> StyleResult<()> {
        let path = path.as_ref();
        let text = self.render(ThemeFormat::from_path(path)?)?;
        tokio::fs::write(path, text).await?;
        Ok(())
    }

    /// The themes shipped with the crate: `default`, `dark`, `fluent`, `material`.
    ///
    /// A built-in that fails to parse is logged and skipped.
    pub fn builtin_themes() -> Vec<Theme> {
        BUILTIN_THEMES
            .iter()
            .filter_map(|(name, source)| match Theme::from_json_str(source) {
                Ok(theme) => Some(theme),
                Err(err) => {
                    log::error!("Built-in theme '{}' failed to load: {}", name, err);
                    None
                }
            })
            .collect()
    }
}

const BUILTIN_THEMES: [(&str, &str); 4] = [
    ("default", include_str!("../themes/default.json")),
    ("dark", include_str!("../themes/dark.json")),
    ("fluent", include_str!("../themes/fluent.json")),
    ("material", include_str!("../themes/material.json")),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_refreshes_identity() {
        let theme = Theme::new("a");
        let id = theme.id();
        let theme = theme.with_color("primary", "#ffffff");
        assert_ne!(theme.id(), id);
    }

    #[test]
    fn test_lookup_paths() {
        let theme = Theme::new("t")
            .with_color("primary", "#0078d4")
            .with_font("heading", Font::new("Segoe UI", 12.0, "bold"))
            .with_spacing("md", 8.0)
            .with_section("borders", crate::style! { "radius" => 4 });

        assert_eq!(theme.lookup("colors.primary"), Some(StyleValue::from("#0078d4")));
        assert_eq!(theme.lookup("fonts.heading.size"), Some(StyleValue::Number(12.0)));
        assert_eq!(theme.lookup("spacing.md"), Some(StyleValue::Number(8.0)));
        assert_eq!(theme.lookup("borders.radius"), Some(StyleValue::Number(4.0)));
        assert_eq!(theme.lookup("borders.missing"), None);
        assert_eq!(theme.lookup("nothing.here"), None);
    }

    #[test]
    fn test_token_requires_section_and_key() {
        let theme = Theme::new("t").with_spacing("md", 8.0);
        assert_eq!(theme.token("@spacing.md"), Some(StyleValue::Number(8.0)));
        assert_eq!(theme.token("@spacing"), None);
        assert_eq!(theme.token("spacing.md"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ThemeFormat::from_path(Path::new("a.JSON")).unwrap(), ThemeFormat::Json);
        assert_eq!(ThemeFormat::from_path(Path::new("a.toml")).unwrap(), ThemeFormat::Toml);
        assert!(ThemeFormat::from_path(Path::new("a.yaml")).is_err());
    }

    #[test]
    fn test_builtins_parse() {
        let names: Vec<String> = Theme::builtin_themes()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, ["default", "dark", "fluent", "material"]);
    }
}
