//! Named event handlers for widgets.
//!
//! Handlers are bound per widget or globally (shared by every widget wired to the
//! same [`SharedHandlers`]). A trigger runs the widget's handlers for the event
//! name in bind order, then the global ones. A handler returning an error is
//! logged and dispatch moves on to the next handler; calling
//! [`WidgetEvent::stop_propagation`] ends dispatch.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use vss::WidgetStates;

use crate::error::HandlerError;

pub type HandlerResult = Result<(), HandlerError>;

type Handler = Box<dyn FnMut(&mut WidgetEvent) -> HandlerResult>;

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a bound handler for [`EventHandlers::unbind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    fn next() -> Self {
        Self(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The event passed to handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetEvent {
    name: String,
    widget_type: String,
    states: WidgetStates,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl WidgetEvent {
    pub fn new(name: impl Into<String>, widget_type: impl Into<String>, states: WidgetStates) -> Self {
        Self {
            name: name.into(),
            widget_type: widget_type.into(),
            states,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn widget_type(&self) -> &str {
        &self.widget_type
    }

    /// The widget's states after the transition that raised the event.
    pub fn states(&self) -> WidgetStates {
        self.states
    }

    /// No further handlers run for this event.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Outcome of one trigger.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchReport {
    /// Handlers that ran, including failed ones.
    pub handled: usize,
    pub failed: Vec<HandlerError>,
    pub stopped: bool,
    pub default_prevented: bool,
}

/// Handlers keyed by event name, in bind order.
#[derive(Default)]
pub struct HandlerTable {
    handlers: IndexMap<String, IndexMap<HandlerId, Handler>>,
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(name, list)| (name, list.len())))
            .finish()
    }
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedHandlers {
        Rc::new(RefCell::new(self))
    }

    pub fn bind<F>(&mut self, event: impl Into<String>, handler: F) -> HandlerId
    where
        F: FnMut(&mut WidgetEvent) -> HandlerResult + 'static,
    {
        let id = HandlerId::next();
        self.handlers
            .entry(event.into())
            .or_default()
            .insert(id, Box::new(handler));
        id
    }

    /// Removes one handler. Returns whether it was bound here.
    pub fn unbind(&mut self, id: HandlerId) -> bool {
        self.handlers
            .values_mut()
            .any(|list| list.shift_remove(&id).is_some())
    }

    /// Removes every handler for `event`, returning how many there were.
    pub fn unbind_all(&mut self, event: &str) -> usize {
        self.handlers.shift_remove(event).map_or(0, |list| list.len())
    }

    pub fn count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, IndexMap::len)
    }

    fn dispatch(&mut self, event: &mut WidgetEvent, report: &mut DispatchReport) {
        let Some(list) = self.handlers.get_mut(event.name()) else {
            return;
        };
        for handler in list.values_mut() {
            report.handled += 1;
            if let Err(err) = handler(event) {
                log::warn!("{}", err);
                report.failed.push(err);
            }
            if event.is_propagation_stopped() {
                report.stopped = true;
                return;
            }
        }
    }
}

/// Global handlers shared between widgets.
pub type SharedHandlers = Rc<RefCell<HandlerTable>>;

/// A widget's own handlers plus an optional shared global table.
#[derive(Debug, Default)]
pub struct EventHandlers {
    local: HandlerTable,
    global: Option<SharedHandlers>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(global: SharedHandlers) -> Self {
        Self {
            local: HandlerTable::new(),
            global: Some(global),
        }
    }

    pub fn global(&self) -> Option<&SharedHandlers> {
        self.global.as_ref()
    }

    pub fn bind<F>(&mut self, event: impl Into<String>, handler: F) -> HandlerId
    where
        F: FnMut(&mut WidgetEvent) -> HandlerResult + 'static,
    {
        self.local.bind(event, handler)
    }

    /// Binds into the shared table, creating one if this widget has none.
    pub fn bind_global<F>(&mut self, event: impl Into<String>, handler: F) -> HandlerId
    where
        F: FnMut(&mut WidgetEvent) -> HandlerResult + 'static,
    {
        self.global
            .get_or_insert_with(|| HandlerTable::new().into_shared())
            .borrow_mut()
            .bind(event, handler)
    }

    /// Removes a local or global handler.
    pub fn unbind(&mut self, id: HandlerId) -> bool {
        if self.local.unbind(id) {
            return true;
        }
        match &self.global {
            Some(global) => global.try_borrow_mut().is_ok_and(|mut table| table.unbind(id)),
            None => false,
        }
    }

    /// Removes this widget's handlers for `event`. Global handlers are kept.
    pub fn unbind_all(&mut self, event: &str) -> usize {
        self.local.unbind_all(event)
    }

    pub fn count(&self, event: &str) -> usize {
        self.local.count(event)
    }

    /// Runs local handlers, then global ones, until one stops propagation.
    ///
    /// Global handlers are skipped with a warning if the shared table is already
    /// borrowed, which happens when a global handler triggers another widget.
    pub fn trigger(&mut self, event: &mut WidgetEvent) -> DispatchReport {
        let mut report = DispatchReport::default();
        self.local.dispatch(event, &mut report);

        if !report.stopped {
            if let Some(global) = &self.global {
                match global.try_borrow_mut() {
                    Ok(mut table) => table.dispatch(event, &mut report),
                    Err(_) => log::warn!("Global handlers busy; skipped for '{}'", event.name()),
                }
            }
        }

        report.default_prevented = event.is_default_prevented();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> WidgetEvent {
        WidgetEvent::new(name, "button", WidgetStates::empty())
    }

    #[test]
    fn test_handler_ids_are_unique() {
        let mut table = HandlerTable::new();
        let a = table.bind("hover_start", |_| Ok(()));
        let b = table.bind("hover_start", |_| Ok(()));
        assert_ne!(a, b);
        assert_eq!(table.count("hover_start"), 2);
    }

    #[test]
    fn test_unbind_unknown_id() {
        let mut handlers = EventHandlers::new();
        let id = handlers.bind("focus_in", |_| Ok(()));
        assert!(handlers.unbind(id));
        assert!(!handlers.unbind(id));
    }

    #[test]
    fn test_trigger_without_handlers() {
        let mut handlers = EventHandlers::new();
        let report = handlers.trigger(&mut event("button_press"));
        assert_eq!(report, DispatchReport::default());
    }
}
