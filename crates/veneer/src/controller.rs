//! Per-widget interactive state and style application.
//!
//! A [`StyleController`] tracks which interactive states a widget is in, resolves
//! its style through the cascade on every transition, and pushes the result to a
//! [`RenderSink`]: primitive properties are configured one by one, effect
//! descriptors go through the [`EffectProcessors`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use vss::normalize::canonical_key;
use vss::{CascadeLayers, StateOverlays, StyleCascadeResolver, StyleClass, StyleMap, StyleResult, WidgetStates};

use crate::effects::{EffectContext, EffectKind, EffectProcessors, EffectRecipe, EffectSet};
use crate::error::SinkError;
use crate::sink::{PropertyClass, RenderSink, classify};

/// Interaction events a render target reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    PointerEnter,
    PointerLeave,
    Press,
    Release,
    FocusIn,
    FocusOut,
}

impl InteractionEvent {
    /// The handler event name triggered after the transition.
    pub fn handler_name(&self) -> &'static str {
        match self {
            InteractionEvent::PointerEnter => "hover_start",
            InteractionEvent::PointerLeave => "hover_end",
            InteractionEvent::Press => "button_press",
            InteractionEvent::Release => "button_release",
            InteractionEvent::FocusIn => "focus_in",
            InteractionEvent::FocusOut => "focus_out",
        }
    }

    fn transition(&self) -> (WidgetStates, bool) {
        match self {
            InteractionEvent::PointerEnter => (WidgetStates::HOVER, true),
            InteractionEvent::PointerLeave => (WidgetStates::HOVER, false),
            InteractionEvent::Press => (WidgetStates::ACTIVE, true),
            InteractionEvent::Release => (WidgetStates::ACTIVE, false),
            InteractionEvent::FocusIn => (WidgetStates::FOCUS, true),
            InteractionEvent::FocusOut => (WidgetStates::FOCUS, false),
        }
    }
}

/// The active state flags of one widget plus its local state overlays.
///
/// Starts in the normal state (no flags). Flags are independent: a widget can be
/// hovered and focused at once. Disabled is only set explicitly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WidgetStyleState {
    flags: WidgetStates,
    overlays: StateOverlays,
}

impl WidgetStyleState {
    pub fn new(overlays: StateOverlays) -> Self {
        Self {
            flags: WidgetStates::empty(),
            overlays,
        }
    }

    pub fn flags(&self) -> WidgetStates {
        self.flags
    }

    pub fn overlays(&self) -> &StateOverlays {
        &self.overlays
    }

    /// Applies an interaction event. Returns whether the flags changed.
    pub fn transition(&mut self, event: InteractionEvent) -> bool {
        let (flag, on) = event.transition();
        self.set_flag(flag, on)
    }

    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        self.set_flag(WidgetStates::DISABLED, disabled)
    }

    fn set_flag(&mut self, flag: WidgetStates, on: bool) -> bool {
        let before = self.flags;
        self.flags.set(flag, on);
        before != self.flags
    }
}

/// What one [`StyleController::apply`] pushed to the sink.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyReport {
    /// Primitive properties the sink accepted, in resolution order.
    pub configured: Vec<String>,
    /// Recipes handed to the sink, including clears.
    pub effects: Vec<EffectRecipe>,
    /// Layout-only properties left for the geometry manager.
    pub layout: Vec<String>,
    /// Properties or effects the sink refused.
    pub rejected: Vec<(String, SinkError)>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Resolves and applies one widget's style.
///
/// Resolutions are memoized per state combination. The memo is dropped when the
/// local style or class changes and when the theme registry moves to a new
/// generation.
pub struct StyleController {
    widget_type: String,
    defaults: StyleMap,
    local: StyleMap,
    state: WidgetStyleState,
    class: Option<Arc<StyleClass>>,
    resolver: Rc<StyleCascadeResolver>,
    effects: Rc<EffectProcessors>,
    memo: RefCell<HashMap<WidgetStates, StyleMap>>,
    memo_generation: Cell<u64>,
    drawn: EffectSet,
    dirty: bool,
}

impl std::fmt::Debug for StyleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleController")
            .field("widget_type", &self.widget_type)
            .field("states", &self.state.flags)
            .field("class", &self.class.as_ref().map(|c| c.name().to_string()))
            .field("drawn", &self.drawn)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl StyleController {
    pub fn new(
        widget_type: impl Into<String>,
        defaults: StyleMap,
        resolver: Rc<StyleCascadeResolver>,
        effects: Rc<EffectProcessors>,
    ) -> Self {
        let generation = resolver.generation();
        Self {
            widget_type: widget_type.into(),
            defaults,
            local: StyleMap::new(),
            state: WidgetStyleState::default(),
            class: None,
            resolver,
            effects,
            memo: RefCell::new(HashMap::new()),
            memo_generation: Cell::new(generation),
            drawn: EffectSet::empty(),
            dirty: true,
        }
    }

    pub fn with_style(mut self, style: StyleMap) -> Self {
        self.set_style(style);
        self
    }

    pub fn with_class(mut self, class: Arc<StyleClass>) -> Self {
        self.set_class(Some(class));
        self
    }

    pub fn widget_type(&self) -> &str {
        &self.widget_type
    }

    pub fn states(&self) -> WidgetStates {
        self.state.flags()
    }

    pub fn state(&self) -> &WidgetStyleState {
        &self.state
    }

    pub fn class(&self) -> Option<&Arc<StyleClass>> {
        self.class.as_ref()
    }

    /// The local style without its state overlays.
    pub fn local_style(&self) -> &StyleMap {
        &self.local
    }

    /// Effects currently drawn on the target.
    pub fn drawn_effects(&self) -> EffectSet {
        self.drawn
    }

    /// Whether the next [`apply`](Self::apply) would change anything.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.memo_generation.get() != self.resolver.generation()
    }

    /// Feeds an interaction event. Returns whether the state changed.
    pub fn handle(&mut self, event: InteractionEvent) -> bool {
        let changed = self.state.transition(event);
        if changed {
            log::debug!("{} {:?} -> {:?}", self.widget_type, event, self.state.flags());
            self.dirty = true;
        }
        changed
    }

    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        let changed = self.state.set_disabled(disabled);
        self.dirty |= changed;
        changed
    }

    /// Replaces every state flag at once.
    pub fn set_state(&mut self, states: WidgetStates) -> bool {
        let changed = self.state.flags != states;
        self.state.flags = states;
        self.dirty |= changed;
        changed
    }

    /// Replaces the local style.
    pub fn set_style(&mut self, style: StyleMap) {
        let (base, overlays) = StateOverlays::extract(&style);
        self.local = base;
        self.state.overlays = overlays;
        self.invalidate();
    }

    /// Merges `style` over the local style. Keys naming the same property under
    /// a different alias are replaced.
    pub fn update_style(&mut self, style: StyleMap) {
        let (base, overlays) = StateOverlays::extract(&style);
        for key in base.keys() {
            let canonical = canonical_key(key);
            let shadowed: Vec<String> = self
                .local
                .keys()
                .filter(|existing| *existing != key && canonical_key(existing) == canonical)
                .cloned()
                .collect();
            for existing in shadowed {
                self.local.remove(&existing);
            }
        }
        self.local.deep_merge(base);
        self.state.overlays.merge(overlays);
        self.invalidate();
    }

    pub fn set_class(&mut self, class: Option<Arc<StyleClass>>) {
        self.class = class;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.memo.borrow_mut().clear();
        self.dirty = true;
    }

    /// The resolved style for the current state.
    pub fn resolved(&self) -> StyleResult<StyleMap> {
        let generation = self.resolver.generation();
        if self.memo_generation.replace(generation) != generation {
            self.memo.borrow_mut().clear();
        }

        let states = self.state.flags();
        if let Some(hit) = self.memo.borrow().get(&states) {
            return Ok(hit.clone());
        }

        let mut layers = CascadeLayers::new()
            .defaults(&self.defaults)
            .local(&self.local)
            .overlays(self.state.overlays())
            .states(states);
        if let Some(class) = self.class.as_deref() {
            layers = layers.class(class);
        }
        let resolved = self.resolver.resolve(&self.widget_type, &layers)?;
        self.memo.borrow_mut().insert(states, resolved.clone());
        Ok(resolved)
    }

    /// Number of memoized state combinations.
    pub fn memoized(&self) -> usize {
        self.memo.borrow().len()
    }

    /// Resolves and pushes the current style to `sink`.
    ///
    /// Sink rejections are logged and collected in the report; only cascade
    /// errors (strict mode) fail the call. Effects drawn by a previous apply and
    /// absent now are cleared.
    pub fn apply(&mut self, sink: &mut dyn RenderSink) -> StyleResult<ApplyReport> {
        let resolved = self.resolved()?;
        let mut report = ApplyReport::default();
        let mut effects = Vec::new();

        for (property, value) in resolved.iter() {
            match classify(property) {
                PropertyClass::Primitive => match sink.configure(property, value) {
                    Ok(()) => report.configured.push(property.clone()),
                    Err(err) => {
                        log::warn!("{}: sink rejected '{}': {}", self.widget_type, property, err);
                        report.rejected.push((property.clone(), err));
                    }
                },
                PropertyClass::Effect(kind) => effects.push((kind, value)),
                PropertyClass::Layout => report.layout.push(property.clone()),
            }
        }

        let context = effect_context(&resolved, sink);
        let mut drawn = EffectSet::empty();
        for (kind, value) in effects {
            let Some(processor) = self.effects.get(kind) else {
                log::debug!("No processor for {:?}; skipping", kind);
                continue;
            };
            if let Some(recipe) = processor.process(value, &context) {
                if self.draw(sink, recipe, &mut report) {
                    drawn = drawn.with(kind);
                }
            }
        }

        let stale: Vec<EffectKind> = self.drawn.kinds().filter(|kind| !drawn.has(*kind)).collect();
        for kind in stale {
            self.draw(sink, EffectRecipe::Clear(kind), &mut report);
        }

        self.drawn = drawn;
        self.dirty = false;
        Ok(report)
    }

    fn draw(&self, sink: &mut dyn RenderSink, recipe: EffectRecipe, report: &mut ApplyReport) -> bool {
        match sink.draw_effect(&recipe) {
            Ok(()) => {
                report.effects.push(recipe);
                true
            }
            Err(err) => {
                let property = recipe.kind().property();
                log::warn!("{}: sink could not draw {}: {}", self.widget_type, property, err);
                report.rejected.push((property.to_string(), err));
                false
            }
        }
    }
}

/// Background and bounds for effect processors. Bounds come from the sink when
/// it knows them, otherwise from the resolved `width`/`height`.
fn effect_context(resolved: &StyleMap, sink: &dyn RenderSink) -> EffectContext {
    let dimension = |name: &str| {
        sink.current(name)
            .and_then(|v| v.as_number())
            .or_else(|| resolved.get(name).and_then(|v| v.as_number()))
            .unwrap_or(0.0)
    };
    EffectContext {
        background: resolved.get("bg").and_then(|v| v.as_str()).map(str::to_string),
        width: dimension("width"),
        height: dimension("height"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_independent() {
        let mut state = WidgetStyleState::default();
        assert!(state.transition(InteractionEvent::PointerEnter));
        assert!(state.transition(InteractionEvent::FocusIn));
        assert_eq!(state.flags(), WidgetStates::HOVER | WidgetStates::FOCUS);

        assert!(state.transition(InteractionEvent::PointerLeave));
        assert_eq!(state.flags(), WidgetStates::FOCUS);
    }

    #[test]
    fn test_repeated_event_is_not_a_change() {
        let mut state = WidgetStyleState::default();
        assert!(state.transition(InteractionEvent::Press));
        assert!(!state.transition(InteractionEvent::Press));
        assert!(!state.transition(InteractionEvent::FocusOut));
    }

    #[test]
    fn test_only_set_disabled_disables() {
        let mut state = WidgetStyleState::default();
        for event in [
            InteractionEvent::PointerEnter,
            InteractionEvent::Press,
            InteractionEvent::FocusIn,
        ] {
            state.transition(event);
        }
        assert!(!state.flags().contains(WidgetStates::DISABLED));
        assert!(state.set_disabled(true));
        assert!(state.flags().contains(WidgetStates::DISABLED));
    }
}
