//! The seam between resolved styles and a concrete widget toolkit.
//!
//! A [`RenderSink`] is one native widget: it accepts primitive properties one at a
//! time, can report the current value of a property, and draws effect recipes.
//! A [`Toolkit`] creates sinks for widget types.

use phf::{phf_map, phf_set};
use vss::StyleValue;

use crate::effects::{EffectKind, EffectRecipe};
use crate::error::SinkError;

/// A native render target.
pub trait RenderSink {
    /// Sets a single primitive property.
    fn configure(&mut self, property: &str, value: &StyleValue) -> Result<(), SinkError>;

    /// Reads a property back, e.g. the laid-out `width` and `height`.
    fn current(&self, property: &str) -> Option<StyleValue>;

    /// Draws, replaces or clears (via [`EffectRecipe::Clear`]) an effect.
    fn draw_effect(&mut self, recipe: &EffectRecipe) -> Result<(), SinkError>;
}

/// Factory for render targets.
pub trait Toolkit {
    type Target: RenderSink;

    fn create(&mut self, widget_type: &str) -> Result<Self::Target, SinkError>;
}

/// How a resolved property reaches the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyClass {
    /// Forwarded to [`RenderSink::configure`].
    Primitive,
    /// Realized by an effect processor.
    Effect(EffectKind),
    /// Consumed by geometry managers; never configured.
    Layout,
}

static EFFECT_PROPERTIES: phf::Map<&'static str, EffectKind> = phf_map! {
    "shadow" => EffectKind::Shadow,
    "radius" => EffectKind::Radius,
    "gradient" => EffectKind::Gradient,
};

static LAYOUT_PROPERTIES: phf::Set<&'static str> = phf_set! {
    "margin",
};

pub fn classify(property: &str) -> PropertyClass {
    if let Some(kind) = EFFECT_PROPERTIES.get(property) {
        return PropertyClass::Effect(*kind);
    }
    if LAYOUT_PROPERTIES.contains(property) {
        return PropertyClass::Layout;
    }
    PropertyClass::Primitive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("shadow"), PropertyClass::Effect(EffectKind::Shadow));
        assert_eq!(classify("radius"), PropertyClass::Effect(EffectKind::Radius));
        assert_eq!(classify("margin"), PropertyClass::Layout);
        assert_eq!(classify("bg"), PropertyClass::Primitive);
        assert_eq!(classify("selectbackground"), PropertyClass::Primitive);
    }
}
