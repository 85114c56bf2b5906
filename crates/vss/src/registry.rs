//! The theme registry: named themes plus the "current theme" pointer.
//!
//! The registry is plain single-threaded state. Applications share one instance as
//! a [`SharedRegistry`] and inject it into the cascade resolver; nothing in this
//! crate reaches for a global.
//!
//! ## Generations
//!
//! Every change that can alter what [`ThemeRegistry::current`] returns bumps
//! [`ThemeRegistry::generation`]. Resolvers and widget controllers compare
//! generations to decide when cached results are stale.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::error::{StyleError, StyleResult};
use crate::theme::{Theme, ThemeData};
use crate::value::{Font, StyleMap, StyleValue};

/// A registry shared by the resolver, widget controllers and application wiring.
pub type SharedRegistry = Rc<RefCell<ThemeRegistry>>;

/// Store of named themes with one optional active theme.
#[derive(Debug, Default)]
pub struct ThemeRegistry {
    themes: IndexMap<String, Arc<Theme>>,
    current: Option<String>,
    stack: Vec<Option<String>>,
    generation: u64,
}

impl ThemeRegistry {
    /// An empty registry with no active theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in themes, with `default` active.
    pub fn with_builtin_themes() -> Self {
        let mut registry = Self::new();
        for theme in Theme::builtin_themes() {
            let name = theme.name().to_string();
            registry.register(name, theme);
        }
        if let Err(err) = registry.activate("default") {
            log::error!("Built-in default theme unavailable: {}", err);
        }
        registry
    }

    /// Wraps the registry for sharing.
    pub fn into_shared(self) -> SharedRegistry {
        Rc::new(RefCell::new(self))
    }

    /// Registers `theme` under `name`, replacing any theme of that name.
    ///
    /// The stored theme is renamed to `name` so export and import agree.
    pub fn register(&mut self, name: impl Into<String>, theme: Theme) -> Arc<Theme> {
        let name = name.into();
        let theme = if theme.name() == name {
            theme
        } else {
            theme.with_name(name.as_str())
        };
        let theme = Arc::new(theme);
        let replaced = self.themes.insert(name.clone(), Arc::clone(&theme));
        if replaced.is_some() && self.current.as_deref() == Some(name.as_str()) {
            self.generation += 1;
            log::info!("Active theme '{}' replaced", name);
        } else {
            log::debug!("Registered theme '{}'", name);
        }
        theme
    }

    /// Removes a theme. Removing the active theme leaves no theme active.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<Theme>> {
        let removed = self.themes.shift_remove(name)?;
        if self.current.as_deref() == Some(name) {
            self.current = None;
            self.generation += 1;
        }
        Some(removed)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Theme>> {
        self.themes.get(name).cloned()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.themes.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Makes `name` the active theme. Fails without touching state if it is not
    /// registered.
    pub fn activate(&mut self, name: &str) -> StyleResult<Arc<Theme>> {
        let theme = self
            .themes
            .get(name)
            .cloned()
            .ok_or_else(|| StyleError::theme_not_found(name))?;
        if self.current.as_deref() != Some(name) {
            self.current = Some(name.to_string());
            self.generation += 1;
            log::info!("Theme switched to '{}'", name);
        }
        Ok(theme)
    }

    pub fn current(&self) -> Option<Arc<Theme>> {
        self.current.as_deref().and_then(|name| self.get(name))
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Activates `name`, remembering the previous theme for [`pop_theme`](Self::pop_theme).
    pub fn push_theme(&mut self, name: &str) -> StyleResult<Arc<Theme>> {
        let previous = self.current.clone();
        let theme = self.activate(name)?;
        self.stack.push(previous);
        Ok(theme)
    }

    /// Restores the theme that was active before the last [`push_theme`](Self::push_theme).
    ///
    /// Returns `false` when nothing was pushed. If the remembered theme has been
    /// unregistered since, no theme is left active.
    pub fn pop_theme(&mut self) -> bool {
        let Some(previous) = self.stack.pop() else {
            return false;
        };
        match previous {
            Some(name) if self.contains(&name) => {
                if let Err(err) = self.activate(&name) {
                    log::warn!("Could not restore theme '{}': {}", name, err);
                }
            }
            _ => {
                if self.current.take().is_some() {
                    self.generation += 1;
                }
            }
        }
        true
    }

    /// Dot-path lookup in the active theme. Any missing segment, or no active
    /// theme, yields `default`.
    pub fn value(&self, path: &str, default: impl Into<StyleValue>) -> StyleValue {
        self.current()
            .and_then(|theme| theme.lookup(path))
            .unwrap_or_else(|| default.into())
    }

    /// A palette colour of the active theme, or `name` itself.
    pub fn get_color(&self, name: &str) -> String {
        self.current()
            .and_then(|theme| theme.color(name).map(str::to_string))
            .unwrap_or_else(|| name.to_string())
    }

    /// A font of the active theme, or the default font.
    pub fn get_font(&self, name: &str) -> Font {
        self.current()
            .and_then(|theme| theme.font(name).cloned())
            .unwrap_or_default()
    }

    /// The active theme's style for a widget type, or an empty map.
    pub fn widget_style(&self, widget: &str) -> StyleMap {
        self.current()
            .and_then(|theme| theme.widget_style(widget).cloned())
            .unwrap_or_default()
    }

    /// Registers a copy of `base` with `overrides` deep-merged over its exported
    /// tree, under `new_name`.
    ///
    /// ```
    /// use vss::{ThemeRegistry, style};
    ///
    /// let mut registry = ThemeRegistry::with_builtin_themes();
    /// let ocean = registry
    ///     .derive_variant("default", &style! {
    ///         "colors" => style! { "primary" => "#006994" },
    ///     }, "ocean")
    ///     .unwrap();
    /// assert_eq!(ocean.color("primary"), Some("#006994"));
    /// assert_eq!(ocean.color("background"), Some("#ffffff"));
    /// ```
    pub fn derive_variant(
        &mut self,
        base: &str,
        overrides: &StyleMap,
        new_name: &str,
    ) -> StyleResult<Arc<Theme>> {
        let base = self.get(base).ok_or_else(|| StyleError::theme_not_found(base))?;
        let mut tree = serde_json::to_value(base.to_data())?;
        merge_json(&mut tree, serde_json::to_value(overrides)?);
        self.register_tree(tree, new_name)
    }

    /// Registers the deep merge of two registered themes, `overlay` winning.
    pub fn merge_themes(&mut self, base: &str, overlay: &str, new_name: &str) -> StyleResult<Arc<Theme>> {
        let base = self.get(base).ok_or_else(|| StyleError::theme_not_found(base))?;
        let overlay = self
            .get(overlay)
            .ok_or_else(|| StyleError::theme_not_found(overlay))?;
        let mut tree = serde_json::to_value(base.to_data())?;
        merge_json(&mut tree, serde_json::to_value(overlay.to_data())?);
        self.register_tree(tree, new_name)
    }

    fn register_tree(&mut self, mut tree: JsonValue, name: &str) -> StyleResult<Arc<Theme>> {
        if let Some(object) = tree.as_object_mut() {
            object.insert("name".to_string(), JsonValue::String(name.to_string()));
        }
        let data: ThemeData = serde_json::from_value(tree)?;
        data.validate()?;
        Ok(self.register(name, Theme::from_data(data)))
    }

    /// Validates and registers theme data, returning its name.
    pub fn import_theme(&mut self, data: ThemeData) -> StyleResult<String> {
        data.validate()?;
        let name = data.name.clone();
        self.register(name.as_str(), Theme::from_data(data));
        Ok(name)
    }

    /// The serializable tree of a registered theme.
    pub fn export_theme(&self, name: &str) -> StyleResult<ThemeData> {
        self.get(name)
            .map(|theme| theme.to_data())
            .ok_or_else(|| StyleError::theme_not_found(name))
    }

    pub fn import_json(&mut self, text: &str) -> StyleResult<String> {
        let data: ThemeData = serde_json::from_str(text)?;
        self.import_theme(data)
    }

    pub fn export_json(&self, name: &str) -> StyleResult<String> {
        Ok(serde_json::to_string_pretty(&self.export_theme(name)?)?)
    }

    /// Loads and registers a `.json` or `.toml` theme file, returning its name.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> StyleResult<String> {
        let theme = Theme::load(path)?;
        let name = theme.name().to_string();
        self.register(name.as_str(), theme);
        Ok(name)
    }

    pub fn save_file(&self, name: &str, path: impl AsRef<Path>) -> StyleResult<()> {
        self.get(name)
            .ok_or_else(|| StyleError::theme_not_found(name))?
            .save(path)
    }

    /// Async variant of [`load_file`](Self::load_file).
    pub async fn load_file_async(&mut self, path: impl AsRef<Path>) -> StyleResult<String> {
        let theme = Theme::load_async(path).await?;
        let name = theme.name().to_string();
        self.register(name.as_str(), theme);
        Ok(name)
    }

    /// Async variant of [`save_file`](Self::save_file).
    pub async fn save_file_async(&self, name: &str, path: impl AsRef<Path>) -> StyleResult<()> {
        let theme = self.get(name).ok_or_else(|| StyleError::theme_not_found(name))?;
        theme.save_async(path).await
    }
}

/// Recursive object merge; anything that is not object-into-object replaces.
fn merge_json(base: &mut JsonValue, patch: JsonValue) {
    match (base, patch) {
        (JsonValue::Object(base), JsonValue::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_json_nested() {
        let mut base = json!({ "colors": { "a": "#000000", "b": "#111111" }, "name": "x" });
        merge_json(&mut base, json!({ "colors": { "b": "#222222" } }));
        assert_eq!(base, json!({ "colors": { "a": "#000000", "b": "#222222" }, "name": "x" }));
    }

    #[test]
    fn test_generation_only_moves_on_change() {
        let mut registry = ThemeRegistry::new();
        registry.register("a", Theme::new("a"));
        let start = registry.generation();
        registry.activate("a").unwrap();
        registry.activate("a").unwrap();
        assert_eq!(registry.generation(), start + 1);
    }
}
