//! Effect processors: turning shadow, radius and gradient descriptors into
//! drawable recipes.
//!
//! Native toolkits rarely support these effects directly. A processor computes a
//! toolkit-neutral [`EffectRecipe`] (layer offsets, polygon points, colour bands)
//! and the sink decides how to draw it, typically on a canvas behind the widget.

mod gradient;
mod radius;
mod shadow;

pub use gradient::GradientProcessor;
pub use radius::RadiusProcessor;
pub use shadow::ShadowProcessor;

use bitflags::bitflags;
use vss::{Color, GradientKind, StyleValue};

/// The effect a recipe realizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Shadow,
    Radius,
    Gradient,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Shadow, EffectKind::Radius, EffectKind::Gradient];

    pub fn property(&self) -> &'static str {
        match self {
            EffectKind::Shadow => "shadow",
            EffectKind::Radius => "radius",
            EffectKind::Gradient => "gradient",
        }
    }

    fn flag(&self) -> EffectSet {
        match self {
            EffectKind::Shadow => EffectSet::SHADOW,
            EffectKind::Radius => EffectSet::RADIUS,
            EffectKind::Gradient => EffectSet::GRADIENT,
        }
    }
}

bitflags! {
    /// The effects currently drawn on a target.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EffectSet: u8 {
        const SHADOW = 0b001;
        const RADIUS = 0b010;
        const GRADIENT = 0b100;
    }
}

impl EffectSet {
    pub fn with(self, kind: EffectKind) -> Self {
        self | kind.flag()
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.contains(kind.flag())
    }

    pub fn kinds(&self) -> impl Iterator<Item = EffectKind> + '_ {
        EffectKind::ALL.into_iter().filter(move |kind| self.has(*kind))
    }
}

/// One offset copy of the widget outline, drawn back to front.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowLayer {
    pub dx: f64,
    pub dy: f64,
    /// Extra size on every side.
    pub spread: f64,
    pub color: String,
}

/// One colour band of a gradient. `start`/`end` are fractions of the gradient axis.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientBand {
    pub start: f64,
    pub end: f64,
    pub color: String,
}

/// A toolkit-neutral drawing recipe.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectRecipe {
    Shadow {
        layers: Vec<ShadowLayer>,
    },
    RoundedRect {
        radius: f64,
        width: f64,
        height: f64,
        /// Outline points, clockwise from the top edge. Empty when the target has
        /// no size yet.
        points: Vec<(f64, f64)>,
        fill: Option<String>,
    },
    Gradient {
        kind: GradientKind,
        direction: String,
        bands: Vec<GradientBand>,
        /// Flat colour for targets that cannot draw bands.
        fallback: String,
    },
    /// Removes a previously drawn effect.
    Clear(EffectKind),
}

impl EffectRecipe {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectRecipe::Shadow { .. } => EffectKind::Shadow,
            EffectRecipe::RoundedRect { .. } => EffectKind::Radius,
            EffectRecipe::Gradient { .. } => EffectKind::Gradient,
            EffectRecipe::Clear(kind) => *kind,
        }
    }
}

/// What a processor knows about the target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectContext {
    /// Resolved background colour of the widget.
    pub background: Option<String>,
    pub width: f64,
    pub height: f64,
}

impl EffectContext {
    pub(crate) fn background_color(&self) -> Color {
        self.background
            .as_deref()
            .and_then(|bg| Color::parse(bg).ok())
            .unwrap_or_else(Color::white)
    }
}

/// Realizes one kind of effect descriptor.
pub trait EffectProcessor {
    fn kind(&self) -> EffectKind;

    /// Builds the recipe for `value`. `None` means the effect should be removed.
    fn process(&self, value: &StyleValue, context: &EffectContext) -> Option<EffectRecipe>;
}

/// The processors a controller hands effect properties to.
pub struct EffectProcessors {
    processors: Vec<Box<dyn EffectProcessor>>,
}

impl std::fmt::Debug for EffectProcessors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.processors.iter().map(|p| p.kind()))
            .finish()
    }
}

impl Default for EffectProcessors {
    fn default() -> Self {
        Self::standard()
    }
}

impl EffectProcessors {
    /// Shadow, radius and gradient processors.
    pub fn standard() -> Self {
        Self {
            processors: vec![
                Box::new(ShadowProcessor::default()),
                Box::new(RadiusProcessor::default()),
                Box::new(GradientProcessor::default()),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { processors: Vec::new() }
    }

    /// Adds `processor`, replacing any processor of the same kind.
    pub fn with_processor(mut self, processor: Box<dyn EffectProcessor>) -> Self {
        self.processors.retain(|p| p.kind() != processor.kind());
        self.processors.push(processor);
        self
    }

    pub fn get(&self, kind: EffectKind) -> Option<&dyn EffectProcessor> {
        self.processors
            .iter()
            .find(|p| p.kind() == kind)
            .map(|p| p.as_ref())
    }
}

/// Parses a colour for blending; unparseable input yields `None`.
pub(crate) fn blendable(color: &str) -> Option<Color> {
    Color::parse(color).ok()
}
