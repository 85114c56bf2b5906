//! Interactive widget states and the style overlays attached to them.
//!
//! A widget is always in the "normal" state; hover, active, focused and disabled
//! are independent flags on top of it. Style sources carry per-state overrides
//! either as prefixed keys (`hover_bg`, `focused_border_color`) or as nested blocks
//! (`hover: { bg: ... }`). [`StateOverlays::extract`] pulls them out of a source so
//! the cascade can apply them last.

use bitflags::bitflags;

use crate::error::StyleResult;
use crate::normalize::{PropertyNormalizer, to_snake_case};
use crate::value::{StyleMap, StyleValue};

bitflags! {
    /// Interactive state flags. The empty set is the normal state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WidgetStates: u8 {
        const FOCUS = 0b0001;
        const HOVER = 0b0010;
        const ACTIVE = 0b0100;
        const DISABLED = 0b1000;
    }
}

/// Names of the state blocks and key prefixes.
pub const STATE_NAMES: [&str; 4] = ["hover", "active", "focused", "disabled"];

/// Overlay application order, lowest precedence first. Disabled always wins.
pub const STATE_ORDER: [(WidgetStates, &str); 4] = [
    (WidgetStates::HOVER, "hover"),
    (WidgetStates::ACTIVE, "active"),
    (WidgetStates::FOCUS, "focused"),
    (WidgetStates::DISABLED, "disabled"),
];

const STATE_PREFIXES: [(&str, &str); 5] = [
    ("hover_", "hover"),
    ("active_", "active"),
    ("focused_", "focused"),
    ("focus_", "focused"),
    ("disabled_", "disabled"),
];

/// Splits `hover_bg` into `("hover", "bg")`. `focus_` is accepted for `focused_`.
pub fn split_state_prefix(key: &str) -> Option<(&'static str, &str)> {
    STATE_PREFIXES.iter().find_map(|(prefix, state)| {
        key.strip_prefix(prefix)
            .filter(|rest| !rest.is_empty())
            .map(|rest| (*state, rest))
    })
}

/// Per-state property overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateOverlays {
    hover: StyleMap,
    active: StyleMap,
    focused: StyleMap,
    disabled: StyleMap,
}

impl StateOverlays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `source` into its stateless properties and its state overlays.
    ///
    /// Overlay keys keep their un-prefixed raw names; normalization happens later.
    pub fn extract(source: &StyleMap) -> (StyleMap, StateOverlays) {
        let mut base = StyleMap::with_capacity(source.len());
        let mut overlays = StateOverlays::default();

        for (key, value) in source {
            let snake = to_snake_case(key);
            if let (Some(state), StyleValue::Map(block)) = (overlays.slot_mut(&snake), value) {
                state.deep_merge(block.clone());
                continue;
            }
            match split_state_prefix(&snake) {
                Some((state, suffix)) => {
                    if let Some(slot) = overlays.slot_mut(state) {
                        slot.insert(suffix, value.clone());
                    }
                }
                None => {
                    base.insert(key.clone(), value.clone());
                }
            }
        }
        (base, overlays)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut StyleMap> {
        match name {
            "hover" => Some(&mut self.hover),
            "active" => Some(&mut self.active),
            "focused" => Some(&mut self.focused),
            "disabled" => Some(&mut self.disabled),
            _ => None,
        }
    }

    fn slot(&self, name: &str) -> Option<&StyleMap> {
        match name {
            "hover" => Some(&self.hover),
            "active" => Some(&self.active),
            "focused" => Some(&self.focused),
            "disabled" => Some(&self.disabled),
            _ => None,
        }
    }

    /// Overrides for a single state flag.
    pub fn get(&self, state: WidgetStates) -> Option<&StyleMap> {
        STATE_ORDER
            .iter()
            .find(|(flag, _)| *flag == state)
            .and_then(|(_, name)| self.slot(name))
    }

    pub fn insert(&mut self, state: WidgetStates, key: impl Into<String>, value: impl Into<StyleValue>) {
        if let Some((_, name)) = STATE_ORDER.iter().find(|(flag, _)| *flag == state) {
            if let Some(slot) = self.slot_mut(name) {
                slot.insert(key, value);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hover.is_empty() && self.active.is_empty() && self.focused.is_empty() && self.disabled.is_empty()
    }

    /// Merges `other` over `self`, state by state.
    pub fn merge(&mut self, other: StateOverlays) {
        self.hover.deep_merge(other.hover);
        self.active.deep_merge(other.active);
        self.focused.deep_merge(other.focused);
        self.disabled.deep_merge(other.disabled);
    }

    /// Normalizes every overlay map.
    pub fn normalized(&self, normalizer: &PropertyNormalizer) -> StyleResult<StateOverlays> {
        Ok(StateOverlays {
            hover: normalizer.normalize(&self.hover)?,
            active: normalizer.normalize(&self.active)?,
            focused: normalizer.normalize(&self.focused)?,
            disabled: normalizer.normalize(&self.disabled)?,
        })
    }

    /// Applies the overlays of every flag in `states`, in [`STATE_ORDER`].
    pub fn apply(&self, acc: &mut StyleMap, states: WidgetStates) {
        for (flag, name) in STATE_ORDER {
            if states.contains(flag) {
                if let Some(overlay) = self.slot(name) {
                    acc.deep_merge(overlay.clone());
                }
            }
        }
    }

    /// Iterates `(flag, overrides)` in application order.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetStates, &StyleMap)> {
        STATE_ORDER
            .iter()
            .filter_map(move |(flag, name)| self.slot(name).map(|map| (*flag, map)))
    }

    /// The flags that have at least one override.
    pub fn styled_states(&self) -> WidgetStates {
        self.iter()
            .filter(|(_, map)| !map.is_empty())
            .fold(WidgetStates::empty(), |acc, (flag, _)| acc | flag)
    }
}
