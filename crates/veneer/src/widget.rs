pub mod kinds;

use std::rc::Rc;
use std::sync::Arc;

use vss::{SharedRegistry, StyleCascadeResolver, StyleClass, StyleMap, StyleResult, WidgetStates};

use crate::controller::{ApplyReport, InteractionEvent, StyleController};
use crate::effects::EffectProcessors;
use crate::error::SinkError;
use crate::events::{DispatchReport, EventHandlers, HandlerId, HandlerResult, SharedHandlers, WidgetEvent};
use crate::sink::{RenderSink, Toolkit};

pub use kinds::WidgetKind;

/// What a concrete widget variant provides: a type name, a default style, and
/// a way to create its native target.
pub trait WidgetVariant {
    fn type_name(&self) -> &str;

    /// Lowest-precedence style after the theme's global defaults.
    fn default_style(&self) -> StyleMap {
        StyleMap::new()
    }

    fn create_target<T: Toolkit>(&self, toolkit: &mut T) -> Result<T::Target, SinkError>
    where
        Self: Sized,
    {
        toolkit.create(self.type_name())
    }
}

/// The shared collaborators every widget is constructed with.
#[derive(Clone, Debug)]
pub struct WidgetContext {
    pub resolver: Rc<StyleCascadeResolver>,
    pub effects: Rc<EffectProcessors>,
    pub global_handlers: Option<SharedHandlers>,
}

impl WidgetContext {
    pub fn new(resolver: Rc<StyleCascadeResolver>) -> Self {
        Self {
            resolver,
            effects: Rc::new(EffectProcessors::standard()),
            global_handlers: None,
        }
    }

    /// A context resolving against `registry`'s current theme.
    pub fn with_registry(registry: SharedRegistry) -> Self {
        Self::new(Rc::new(StyleCascadeResolver::new(registry)))
    }

    pub fn with_effects(mut self, effects: EffectProcessors) -> Self {
        self.effects = Rc::new(effects);
        self
    }

    pub fn with_global_handlers(mut self, handlers: SharedHandlers) -> Self {
        self.global_handlers = Some(handlers);
        self
    }
}

/// A styled native widget: controller, render target and event handlers.
#[derive(Debug)]
pub struct Widget<S: RenderSink> {
    controller: StyleController,
    sink: S,
    handlers: EventHandlers,
}

impl<S: RenderSink> Widget<S> {
    /// Wraps an existing target. Nothing is applied until [`refresh`](Self::refresh).
    pub fn new(variant: &impl WidgetVariant, sink: S, context: &WidgetContext) -> Self {
        let controller = StyleController::new(
            variant.type_name(),
            variant.default_style(),
            context.resolver.clone(),
            context.effects.clone(),
        );
        let handlers = match &context.global_handlers {
            Some(global) => EventHandlers::with_global(global.clone()),
            None => EventHandlers::new(),
        };
        Self {
            controller,
            sink,
            handlers,
        }
    }

    /// Creates the target through `toolkit`.
    pub fn create<V, T>(variant: &V, toolkit: &mut T, context: &WidgetContext) -> Result<Self, SinkError>
    where
        V: WidgetVariant,
        T: Toolkit<Target = S>,
    {
        let sink = variant.create_target(toolkit)?;
        Ok(Self::new(variant, sink, context))
    }

    pub fn with_style(mut self, style: StyleMap) -> Self {
        self.controller.set_style(style);
        self
    }

    pub fn with_class(mut self, class: Arc<StyleClass>) -> Self {
        self.controller.set_class(Some(class));
        self
    }

    pub fn widget_type(&self) -> &str {
        self.controller.widget_type()
    }

    pub fn states(&self) -> WidgetStates {
        self.controller.states()
    }

    pub fn controller(&self) -> &StyleController {
        &self.controller
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn handlers_mut(&mut self) -> &mut EventHandlers {
        &mut self.handlers
    }

    /// Resolves and applies the current style.
    pub fn refresh(&mut self) -> StyleResult<ApplyReport> {
        self.controller.apply(&mut self.sink)
    }

    /// Applies only if state, style or theme changed since the last apply.
    pub fn refresh_if_dirty(&mut self) -> StyleResult<Option<ApplyReport>> {
        if !self.controller.is_dirty() {
            return Ok(None);
        }
        self.refresh().map(Some)
    }

    /// Handles an interaction event from the target: updates state, re-applies
    /// the style if it changed, then triggers the event's handlers.
    pub fn dispatch(&mut self, event: InteractionEvent) -> StyleResult<DispatchReport> {
        if self.controller.handle(event) {
            self.refresh()?;
        }
        Ok(self.trigger(event.handler_name()))
    }

    pub fn set_disabled(&mut self, disabled: bool) -> StyleResult<()> {
        if self.controller.set_disabled(disabled) {
            self.refresh()?;
        }
        Ok(())
    }

    pub fn is_disabled(&self) -> bool {
        self.states().contains(WidgetStates::DISABLED)
    }

    /// Replaces the local style and re-applies.
    pub fn set_style(&mut self, style: StyleMap) -> StyleResult<ApplyReport> {
        self.controller.set_style(style);
        self.refresh()
    }

    /// Merges into the local style and re-applies.
    pub fn update_style(&mut self, style: StyleMap) -> StyleResult<ApplyReport> {
        self.controller.update_style(style);
        self.refresh()
    }

    pub fn set_class(&mut self, class: Option<Arc<StyleClass>>) -> StyleResult<ApplyReport> {
        self.controller.set_class(class);
        self.refresh()
    }

    pub fn bind<F>(&mut self, event: impl Into<String>, handler: F) -> HandlerId
    where
        F: FnMut(&mut WidgetEvent) -> HandlerResult + 'static,
    {
        self.handlers.bind(event, handler)
    }

    pub fn unbind(&mut self, id: HandlerId) -> bool {
        self.handlers.unbind(id)
    }

    /// Runs the handlers bound to `event`.
    pub fn trigger(&mut self, event: &str) -> DispatchReport {
        let mut event = WidgetEvent::new(event, self.controller.widget_type(), self.controller.states());
        self.handlers.trigger(&mut event)
    }
}
