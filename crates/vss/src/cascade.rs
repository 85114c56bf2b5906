//! The style cascade: merging prioritized style sources into one resolved map.
//!
//! ## Precedence
//!
//! Lowest to highest:
//!
//! 1. Universal baseline (`font`, `border_width`)
//! 2. The theme's global widget style (`widgets["*"]`)
//! 3. The widget type's built-in default style
//! 4. The theme's style for the widget type
//! 5. The style class chain, root ancestor first
//! 6. Local instance overrides
//! 7. State overlays for the active flags, in the order
//!    hover < active < focused < disabled
//!
//! ## Per-source pipeline
//!
//! Each source is token-expanded (`@fonts.default`, `@spacing.md`, ...), split into
//! stateless properties and state overlays, normalized, and deep-merged into the
//! accumulator. After the last overlay, partial font/shadow/gradient maps become
//! typed descriptors and colour properties go through the [`ColorResolver`].
//!
//! Token expansion is a single pass. A token whose target is itself a token is
//! not followed.

use std::cell::Cell;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::color::{COLOR_TOKEN_PREFIX, ColorResolver, is_color_property};
use crate::error::StyleResult;
use crate::normalize::PropertyNormalizer;
use crate::registry::SharedRegistry;
use crate::state::{StateOverlays, WidgetStates};
use crate::style_class::StyleClass;
use crate::theme::Theme;
use crate::value::{Font, Gradient, Shadow, StyleMap, StyleValue};

/// Key of the theme-wide widget style.
pub const GLOBAL_WIDGET_STYLE: &str = "*";

static BASELINE: Lazy<StyleMap> = Lazy::new(|| {
    let mut baseline = StyleMap::new();
    baseline.insert("font", Font::default());
    baseline.insert("border_width", 0);
    baseline
});

/// The universal baseline every resolution starts from.
pub fn baseline_style() -> &'static StyleMap {
    &BASELINE
}

/// Resolver behaviour switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Surface malformed values as errors instead of degrading them.
    pub strict: bool,
    /// Cache colour resolutions per theme.
    pub color_cache: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            strict: false,
            color_cache: true,
        }
    }
}

/// The non-theme inputs of one resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct CascadeLayers<'a> {
    pub widget_defaults: Option<&'a StyleMap>,
    pub style_class: Option<&'a StyleClass>,
    pub local: Option<&'a StyleMap>,
    /// State overlays already extracted from the local style.
    pub local_overlays: Option<&'a StateOverlays>,
    pub states: WidgetStates,
}

impl<'a> CascadeLayers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults(mut self, defaults: &'a StyleMap) -> Self {
        self.widget_defaults = Some(defaults);
        self
    }

    pub fn class(mut self, class: &'a StyleClass) -> Self {
        self.style_class = Some(class);
        self
    }

    pub fn local(mut self, local: &'a StyleMap) -> Self {
        self.local = Some(local);
        self
    }

    pub fn overlays(mut self, overlays: &'a StateOverlays) -> Self {
        self.local_overlays = Some(overlays);
        self
    }

    pub fn states(mut self, states: WidgetStates) -> Self {
        self.states = states;
        self
    }
}

/// Resolves widget styles through the cascade.
///
/// The resolver is bound to a [`SharedRegistry`] for the current theme, or
/// detached, in which case themes are passed explicitly.
///
/// # Examples
///
/// ```rust
/// use vss::{CascadeLayers, StyleCascadeResolver, StyleValue, ThemeRegistry, style};
///
/// let registry = ThemeRegistry::with_builtin_themes().into_shared();
/// let resolver = StyleCascadeResolver::new(registry);
///
/// let local = style! { "backgroundColor" => "@colors.primary", "padding" => (4, 8) };
/// let resolved = resolver.resolve("button", &CascadeLayers::new().local(&local)).unwrap();
///
/// assert_eq!(resolved.get("bg"), Some(&StyleValue::from("#0078d4")));
/// assert_eq!(resolved.get("padx"), Some(&StyleValue::Number(4.0)));
/// assert_eq!(resolved.get("pady"), Some(&StyleValue::Number(8.0)));
/// ```
#[derive(Debug)]
pub struct StyleCascadeResolver {
    registry: Option<SharedRegistry>,
    options: ResolverOptions,
    normalizer: PropertyNormalizer,
    colors: ColorResolver,
    seen_generation: Cell<u64>,
}

impl StyleCascadeResolver {
    pub fn new(registry: SharedRegistry) -> Self {
        Self::with_options(Some(registry), ResolverOptions::default())
    }

    /// A resolver without a registry.
    pub fn detached() -> Self {
        Self::with_options(None, ResolverOptions::default())
    }

    pub fn with_options(registry: Option<SharedRegistry>, options: ResolverOptions) -> Self {
        let seen_generation = registry
            .as_ref()
            .and_then(|r| r.try_borrow().ok().map(|r| r.generation()))
            .unwrap_or(0);
        Self {
            registry,
            options,
            normalizer: if options.strict {
                PropertyNormalizer::strict()
            } else {
                PropertyNormalizer::new()
            },
            colors: ColorResolver::with_cache(options.color_cache),
            seen_generation: Cell::new(seen_generation),
        }
    }

    pub fn registry(&self) -> Option<&SharedRegistry> {
        self.registry.as_ref()
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    pub fn normalizer(&self) -> &PropertyNormalizer {
        &self.normalizer
    }

    pub fn color_resolver(&self) -> &ColorResolver {
        &self.colors
    }

    /// The registry generation, or `0` when detached.
    pub fn generation(&self) -> u64 {
        self.registry
            .as_ref()
            .and_then(|r| r.try_borrow().ok().map(|r| r.generation()))
            .unwrap_or_else(|| self.seen_generation.get())
    }

    /// Snapshots the registry's current theme.
    ///
    /// The registry borrow ends before this returns, so a theme switch can only
    /// land between resolutions. Seeing a new generation drops the colour cache.
    pub fn current_theme(&self) -> Option<Arc<Theme>> {
        let registry = self.registry.as_ref()?;
        let Ok(registry) = registry.try_borrow() else {
            log::warn!("Theme registry is mutably borrowed; resolving without a theme");
            return None;
        };
        let generation = registry.generation();
        if generation != self.seen_generation.replace(generation) {
            log::debug!("Registry generation {} -> dropping color cache", generation);
            self.colors.invalidate();
        }
        registry.current()
    }

    /// Resolves against the registry's current theme.
    pub fn resolve(&self, widget_type: &str, layers: &CascadeLayers<'_>) -> StyleResult<StyleMap> {
        let theme = self.current_theme();
        self.resolve_with_theme(widget_type, layers, theme.as_deref())
    }

    /// Resolves against an explicit theme (or none).
    ///
    /// An unknown widget type simply contributes no theme or default layers.
    pub fn resolve_with_theme(
        &self,
        widget_type: &str,
        layers: &CascadeLayers<'_>,
        theme: Option<&Theme>,
    ) -> StyleResult<StyleMap> {
        let mut sources: Vec<&StyleMap> = Vec::with_capacity(8);
        sources.push(&BASELINE);
        if let Some(global) = theme.and_then(|t| t.widget_style(GLOBAL_WIDGET_STYLE)) {
            sources.push(global);
        }
        if let Some(defaults) = layers.widget_defaults {
            sources.push(defaults);
        }
        if let Some(themed) = theme.and_then(|t| t.widget_style(widget_type)) {
            sources.push(themed);
        }
        if let Some(class) = layers.style_class {
            sources.extend(class.chain().into_iter().map(StyleClass::style));
        }
        if let Some(local) = layers.local {
            sources.push(local);
        }

        let (mut acc, mut overlays) = self.accumulate(&sources, theme)?;
        if let Some(extra) = layers.local_overlays {
            let extra = self.expand_overlays(extra, theme);
            overlays.merge(extra.normalized(&self.normalizer)?);
        }
        overlays.apply(&mut acc, layers.states);

        let resolved = self.finalize(acc, theme);
        log::trace!(
            "CASCADE: Widget='{}' States={:?} -> {} properties (theme={:?})",
            widget_type,
            layers.states,
            resolved.len(),
            theme.map(Theme::name)
        );
        Ok(resolved)
    }

    /// Merges `sources` in ascending precedence, with no baseline and no state
    /// overlays applied.
    pub fn merge_sources(&self, sources: &[&StyleMap], theme: Option<&Theme>) -> StyleResult<StyleMap> {
        let (acc, _) = self.accumulate(sources, theme)?;
        Ok(self.finalize(acc, theme))
    }

    fn accumulate(&self, sources: &[&StyleMap], theme: Option<&Theme>) -> StyleResult<(StyleMap, StateOverlays)> {
        let mut acc = StyleMap::new();
        let mut overlays = StateOverlays::new();
        for source in sources {
            let expanded = expand_tokens(source, theme);
            let (base, source_overlays) = StateOverlays::extract(&expanded);
            acc.deep_merge(self.normalizer.normalize(&base)?);
            overlays.merge(source_overlays.normalized(&self.normalizer)?);
        }
        Ok((acc, overlays))
    }

    fn expand_overlays(&self, overlays: &StateOverlays, theme: Option<&Theme>) -> StateOverlays {
        let mut expanded = StateOverlays::new();
        for (flag, map) in overlays.iter() {
            for (key, value) in expand_tokens(map, theme) {
                expanded.insert(flag, key, value);
            }
        }
        expanded
    }

    /// Completes partial descriptors and resolves colours.
    fn finalize(&self, acc: StyleMap, theme: Option<&Theme>) -> StyleMap {
        let mut resolved = StyleMap::with_capacity(acc.len());
        for (key, value) in acc {
            let value = match (key.as_str(), value) {
                ("font", StyleValue::Map(partial)) => {
                    StyleValue::Font(Font::from_partial(&partial, &Font::default()))
                }
                ("shadow", StyleValue::Map(partial)) => StyleValue::Shadow(Shadow::from_partial(&partial)),
                ("gradient", StyleValue::Map(partial)) => match Gradient::from_partial(&partial) {
                    Some(gradient) => StyleValue::Gradient(gradient),
                    None => {
                        log::warn!("Dropping gradient with fewer than two colors");
                        continue;
                    }
                },
                (_, value) => value,
            };
            let value = self.resolve_colors(&key, value, theme);
            resolved.insert(key, value);
        }
        resolved
    }

    fn resolve_colors(&self, key: &str, value: StyleValue, theme: Option<&Theme>) -> StyleValue {
        match value {
            StyleValue::Shadow(mut shadow) => {
                shadow.color = self.colors.resolve_str(&shadow.color, theme);
                StyleValue::Shadow(shadow)
            }
            StyleValue::Gradient(mut gradient) => {
                for stop in gradient.colors.iter_mut() {
                    *stop = self.colors.resolve_str(stop, theme);
                }
                StyleValue::Gradient(gradient)
            }
            value if is_color_property(key) => self.colors.resolve(&value, theme),
            StyleValue::Str(s) if s.starts_with(COLOR_TOKEN_PREFIX) => {
                StyleValue::Str(self.colors.resolve_str(&s, theme))
            }
            value => value,
        }
    }
}

/// Replaces non-colour `@section.key` tokens with theme values, one pass deep.
pub fn expand_tokens(source: &StyleMap, theme: Option<&Theme>) -> StyleMap {
    source
        .iter()
        .map(|(key, value)| (key.clone(), expand_value(value, theme)))
        .collect()
}

fn expand_value(value: &StyleValue, theme: Option<&Theme>) -> StyleValue {
    match value {
        StyleValue::Str(token) if token.starts_with('@') && !token.starts_with(COLOR_TOKEN_PREFIX) => {
            match theme.and_then(|t| t.token(token)) {
                Some(expanded) => expanded,
                None => {
                    log::debug!("Unresolved token '{}'", token);
                    value.clone()
                }
            }
        }
        StyleValue::List(items) => StyleValue::List(items.iter().map(|v| expand_value(v, theme)).collect()),
        StyleValue::Map(map) => StyleValue::Map(expand_tokens(map, theme)),
        other => other.clone(),
    }
}
