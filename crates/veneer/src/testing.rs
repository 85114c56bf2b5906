//! Test utilities: render targets that record what they are given.
//!
//! [`RecordingSink`] stands in for a native widget. It keeps every configure call
//! and effect recipe, can be told to reject properties, and can report a laid-out
//! size for effect processors.
//!
//! # Example
//!
//! ```rust
//! use veneer::testing::RecordingSink;
//! use veneer::{StyleController, EffectProcessors};
//! use vss::{StyleCascadeResolver, StyleValue, ThemeRegistry, style};
//! use std::rc::Rc;
//!
//! let registry = ThemeRegistry::with_builtin_themes().into_shared();
//! let resolver = Rc::new(StyleCascadeResolver::new(registry));
//! let mut controller = StyleController::new("label", style! {}, resolver, Rc::new(EffectProcessors::standard()))
//!     .with_style(style! { "bg" => "#ff0000" });
//!
//! let mut sink = RecordingSink::new("label").rejecting(["anchor"]);
//! let report = controller.apply(&mut sink).unwrap();
//!
//! assert_eq!(sink.property("bg"), Some(&StyleValue::from("#ff0000")));
//! assert!(report.is_clean());
//! ```

use indexmap::IndexMap;
use vss::StyleValue;

use crate::effects::{EffectKind, EffectRecipe};
use crate::error::SinkError;
use crate::sink::{RenderSink, Toolkit};

/// A [`RenderSink`] that records everything.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    widget_type: String,
    properties: IndexMap<String, StyleValue>,
    calls: Vec<(String, StyleValue)>,
    effects: Vec<EffectRecipe>,
    rejects: Vec<String>,
    size: Option<(f64, f64)>,
}

impl RecordingSink {
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            ..Default::default()
        }
    }

    /// Refuses the named properties with [`SinkError::UnsupportedProperty`].
    pub fn rejecting<I, P>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.rejects.extend(properties.into_iter().map(Into::into));
        self
    }

    /// Reports this size through `current("width")` / `current("height")`.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn widget_type(&self) -> &str {
        &self.widget_type
    }

    /// The last value configured for `property`.
    pub fn property(&self, property: &str) -> Option<&StyleValue> {
        self.properties.get(property)
    }

    /// Every configure call in order, including repeats.
    pub fn calls(&self) -> &[(String, StyleValue)] {
        &self.calls
    }

    pub fn effects(&self) -> &[EffectRecipe] {
        &self.effects
    }

    /// Effects drawn and not cleared since.
    pub fn active_effects(&self) -> Vec<EffectKind> {
        let mut active: Vec<EffectKind> = Vec::new();
        for recipe in &self.effects {
            let kind = recipe.kind();
            active.retain(|k| *k != kind);
            if !matches!(recipe, EffectRecipe::Clear(_)) {
                active.push(kind);
            }
        }
        active
    }

    /// Forgets recorded calls and effects; configured values are kept.
    pub fn clear_log(&mut self) {
        self.calls.clear();
        self.effects.clear();
    }
}

impl RenderSink for RecordingSink {
    fn configure(&mut self, property: &str, value: &StyleValue) -> Result<(), SinkError> {
        if self.rejects.iter().any(|r| r == property) {
            return Err(SinkError::unsupported(property));
        }
        self.calls.push((property.to_string(), value.clone()));
        self.properties.insert(property.to_string(), value.clone());
        Ok(())
    }

    fn current(&self, property: &str) -> Option<StyleValue> {
        match (property, self.size) {
            ("width", Some((width, _))) => Some(StyleValue::Number(width)),
            ("height", Some((_, height))) => Some(StyleValue::Number(height)),
            _ => self.properties.get(property).cloned(),
        }
    }

    fn draw_effect(&mut self, recipe: &EffectRecipe) -> Result<(), SinkError> {
        if self.rejects.iter().any(|r| r == recipe.kind().property()) {
            return Err(SinkError::unsupported(recipe.kind().property()));
        }
        self.effects.push(recipe.clone());
        Ok(())
    }
}

/// A [`Toolkit`] producing [`RecordingSink`]s.
#[derive(Clone, Debug, Default)]
pub struct RecordingToolkit {
    created: Vec<String>,
    rejects: Vec<String>,
    size: Option<(f64, f64)>,
    unavailable: Vec<String>,
}

impl RecordingToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every created sink rejects these properties.
    pub fn rejecting<I, P>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.rejects.extend(properties.into_iter().map(Into::into));
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Creating this widget type fails.
    pub fn without(mut self, widget_type: impl Into<String>) -> Self {
        self.unavailable.push(widget_type.into());
        self
    }

    /// Widget types created so far.
    pub fn created(&self) -> &[String] {
        &self.created
    }
}

impl Toolkit for RecordingToolkit {
    type Target = RecordingSink;

    fn create(&mut self, widget_type: &str) -> Result<RecordingSink, SinkError> {
        if self.unavailable.iter().any(|t| t == widget_type) {
            return Err(SinkError::CreateFailed {
                widget_type: widget_type.to_string(),
                reason: "not available".to_string(),
            });
        }
        self.created.push(widget_type.to_string());
        let mut sink = RecordingSink::new(widget_type).rejecting(self.rejects.iter().cloned());
        sink.size = self.size;
        Ok(sink)
    }
}
