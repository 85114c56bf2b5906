//! Veneer: themed, cascading styles for native widget toolkits.
//!
//! This crate is the application-facing entry point. It re-exports the style
//! engine ([`vss`]) and the widget layer ([`veneer`]), and provides [`App`], which
//! wires a theme registry, a resolver and shared event handlers together.
//!
//! # Example
//!
//! ```rust
//! use veneer_rs::prelude::*;
//! use veneer_rs::testing::RecordingToolkit;
//!
//! let app = App::new().unwrap();
//! let mut toolkit = RecordingToolkit::new();
//!
//! let mut button = app.create(&WidgetKind::Button, &mut toolkit).unwrap();
//! button.dispatch(InteractionEvent::PointerEnter).unwrap();
//!
//! app.switch_theme("dark").unwrap();
//! button.refresh_if_dirty().unwrap();
//! ```

pub mod error;

use std::rc::Rc;
use std::sync::Arc;

pub use error::{Error, Result};
pub use veneer::{
    ApplyReport, DispatchReport, EffectKind, EffectProcessors, EffectRecipe, HandlerError, HandlerId,
    HandlerResult, HandlerTable, InteractionEvent, RenderSink, SharedHandlers, SinkError, StyleController,
    Toolkit, Widget, WidgetContext, WidgetEvent, WidgetKind, WidgetVariant, init_logger, testing,
};
pub use vss::{
    CascadeLayers, Color, ResolverOptions, SharedRegistry, StyleCascadeResolver, StyleClass, StyleError, StyleMap,
    StyleValue, Theme, ThemeConfig, ThemeRegistry, WidgetStates, style,
};

// Re-export the log crate so users can use veneer_rs::log::info!, etc.
pub use log;

pub mod prelude {
    pub use crate::{
        App, Error, InteractionEvent, Result, StyleClass, StyleMap, StyleValue, ThemeConfig, Widget, WidgetKind,
        WidgetVariant, style,
    };
}

thread_local! {
    static DEFAULT_REGISTRY: SharedRegistry = ThemeRegistry::with_builtin_themes().into_shared();
}

/// The per-thread default registry, preloaded with the built-in themes.
///
/// Styling is single-threaded; each UI thread gets its own registry.
pub fn default_registry() -> SharedRegistry {
    DEFAULT_REGISTRY.with(|registry| registry.clone())
}

/// Application wiring: one registry, one resolver, one set of global handlers.
#[derive(Debug)]
pub struct App {
    registry: SharedRegistry,
    context: WidgetContext,
    handlers: SharedHandlers,
    config: ThemeConfig,
}

impl App {
    /// Uses the default registry and configuration.
    pub fn new() -> Result<Self> {
        Self::with_registry(default_registry(), ThemeConfig::default())
    }

    /// Configuration from `VENEER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::with_config(ThemeConfig::from_env_or_default())
    }

    pub fn with_config(config: ThemeConfig) -> Result<Self> {
        Self::with_registry(default_registry(), config)
    }

    /// Applies `config` to `registry` and builds a resolver from it.
    pub fn with_registry(registry: SharedRegistry, config: ThemeConfig) -> Result<Self> {
        {
            let mut guard = registry.try_borrow_mut().map_err(|_| StyleError::RegistryBusy)?;
            let theme = config.apply(&mut guard)?;
            log::info!("Active theme: {}", theme.name());
        }

        let resolver = StyleCascadeResolver::with_options(Some(registry.clone()), config.resolver_options());
        let handlers = HandlerTable::new().into_shared();
        let context = WidgetContext::new(Rc::new(resolver)).with_global_handlers(handlers.clone());
        Ok(Self {
            registry,
            context,
            handlers,
            config,
        })
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn context(&self) -> &WidgetContext {
        &self.context
    }

    pub fn handlers(&self) -> &SharedHandlers {
        &self.handlers
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn current_theme(&self) -> Option<Arc<Theme>> {
        self.registry.try_borrow().ok().and_then(|r| r.current())
    }

    /// Creates a widget through `toolkit` and applies its initial style.
    pub fn create<V, T>(&self, variant: &V, toolkit: &mut T) -> Result<Widget<T::Target>>
    where
        V: WidgetVariant,
        T: Toolkit,
    {
        let mut widget = Widget::create(variant, toolkit, &self.context)?;
        widget.refresh()?;
        Ok(widget)
    }

    /// Activates a registered theme.
    ///
    /// Fails with [`StyleError::RegistryBusy`] if the registry is borrowed, e.g.
    /// when called from inside a resolution. Widgets pick the new theme up on
    /// their next [`Widget::refresh_if_dirty`].
    pub fn switch_theme(&self, name: &str) -> Result<Arc<Theme>> {
        let mut registry = self.registry.try_borrow_mut().map_err(|_| StyleError::RegistryBusy)?;
        let theme = registry.activate(name)?;
        log::info!("Switched theme to '{}'", theme.name());
        Ok(theme)
    }

    /// Re-applies every widget whose style is out of date. Returns how many were.
    pub fn refresh_all<S: RenderSink>(&self, widgets: &mut [Widget<S>]) -> Result<usize> {
        let mut refreshed = 0;
        for widget in widgets.iter_mut() {
            if widget.refresh_if_dirty()?.is_some() {
                refreshed += 1;
            }
        }
        Ok(refreshed)
    }

    /// Binds a handler that runs for every widget created by this app.
    ///
    /// Fails with [`Error::HandlersBusy`] when called from inside a dispatch.
    pub fn bind_global<F>(&self, event: impl Into<String>, handler: F) -> Result<HandlerId>
    where
        F: FnMut(&mut WidgetEvent) -> HandlerResult + 'static,
    {
        let mut table = self.handlers.try_borrow_mut().map_err(|_| Error::HandlersBusy)?;
        Ok(table.bind(event, handler))
    }
}
