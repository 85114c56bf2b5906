//! # VSS - Veneer Style System
//!
//! The toolkit-independent half of Veneer: a themed, cascading style engine that
//! turns loosely written style declarations into the flat property maps a native
//! widget toolkit understands.
//!
//! This crate provides:
//!
//! - **Values**: [`StyleValue`] and [`StyleMap`], with typed [`Font`], [`Spacing`],
//!   [`Shadow`] and [`Gradient`] descriptors
//! - **Normalization**: CSS, Tk and canonical property names folded into one set
//!   by [`PropertyNormalizer`]
//! - **Themes**: named palettes, fonts, spacing and per-widget styles in a
//!   [`ThemeRegistry`], loadable from JSON or TOML
//! - **Cascade**: [`StyleCascadeResolver`] merges baseline, theme, defaults, style
//!   classes, local overrides and state overlays into a resolved map
//!
//! ## Quick Start
//!
//! ```rust
//! use vss::{CascadeLayers, StyleCascadeResolver, StyleValue, ThemeRegistry, WidgetStates, style};
//!
//! let registry = ThemeRegistry::with_builtin_themes().into_shared();
//! let resolver = StyleCascadeResolver::new(registry.clone());
//!
//! let local = style! {
//!     "bg" => "@colors.surface",
//!     "hover_bg" => "#e9ecef",
//! };
//! let layers = CascadeLayers::new().local(&local).states(WidgetStates::HOVER);
//! let resolved = resolver.resolve("button", &layers).unwrap();
//!
//! assert_eq!(resolved.get("bg"), Some(&StyleValue::from("#e9ecef")));
//!
//! registry.borrow_mut().activate("dark").unwrap();
//! let resolved = resolver.resolve("label", &CascadeLayers::new()).unwrap();
//! assert!(resolved.contains_key("fg"));
//! ```
//!
//! ## Property Names
//!
//! Canonical names follow Tk: `bg`, `fg`, `font`, `padx`, `pady`, `border_width`,
//! `border_color`, `radius`, `shadow`, `gradient`. Aliases such as
//! `backgroundColor`, `border-radius` or `bd` are accepted anywhere a style map is.
//!
//! ## State Overlays
//!
//! - `hover_*` / `hover: {..}` - pointer is over the widget
//! - `active_*` / `active: {..}` - widget is being pressed
//! - `focused_*` / `focused: {..}` - widget has keyboard focus
//! - `disabled_*` / `disabled: {..}` - widget is not interactive
//!
//! When several states are active, later ones in that list win.

pub mod cascade;
pub mod color;
pub mod config;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod state;
pub mod style_class;
pub mod theme;
pub mod value;

mod macros;

pub use cascade::{CascadeLayers, ResolverOptions, StyleCascadeResolver, baseline_style};
pub use color::{Color, ColorResolver, is_color_property};
pub use config::ThemeConfig;
pub use error::{StyleError, StyleResult};
pub use normalize::PropertyNormalizer;
pub use registry::{SharedRegistry, ThemeRegistry};
pub use state::{StateOverlays, WidgetStates};
pub use style_class::StyleClass;
pub use theme::{Theme, ThemeData, ThemeFormat, ThemeId};
pub use value::{Border, Font, FontWeight, Gradient, GradientKind, Shadow, Spacing, StyleMap, StyleValue};
