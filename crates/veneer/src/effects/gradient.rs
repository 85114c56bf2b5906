use vss::{Color, Gradient, GradientKind, StyleValue};

use super::{EffectContext, EffectKind, EffectProcessor, EffectRecipe, GradientBand, blendable};

const UNSIZED_BANDS: usize = 16;

/// Splits a gradient into flat colour bands along its axis.
///
/// Linear gradients band along `direction` (`vertical` top to bottom,
/// `horizontal` left to right); radial gradients band from the centre out. The
/// first and last band carry the first and last stop exactly.
#[derive(Clone, Debug)]
pub struct GradientProcessor {
    max_bands: usize,
}

impl Default for GradientProcessor {
    fn default() -> Self {
        Self { max_bands: 32 }
    }
}

impl GradientProcessor {
    pub fn with_max_bands(max_bands: usize) -> Self {
        Self {
            max_bands: max_bands.max(2),
        }
    }

    fn band_count(&self, gradient: &Gradient, context: &EffectContext) -> usize {
        let axis = match (gradient.kind, gradient.direction.as_str()) {
            (GradientKind::Radial, _) => context.width.min(context.height) / 2.0,
            (GradientKind::Linear, "horizontal") => context.width,
            (GradientKind::Linear, _) => context.height,
        };
        if axis <= 0.0 {
            return UNSIZED_BANDS.min(self.max_bands);
        }
        (axis.round() as usize).clamp(2, self.max_bands)
    }

    pub fn bands(&self, gradient: &Gradient, context: &EffectContext) -> Vec<GradientBand> {
        let stops: Option<Vec<Color>> = gradient.colors.iter().map(|c| blendable(c)).collect();
        let Some(stops) = stops.filter(|s| s.len() >= 2) else {
            // Named colours cannot be interpolated; fall back to one band per stop.
            let n = gradient.colors.len().max(1) as f64;
            return gradient
                .colors
                .iter()
                .enumerate()
                .map(|(i, color)| GradientBand {
                    start: i as f64 / n,
                    end: (i + 1) as f64 / n,
                    color: color.clone(),
                })
                .collect();
        };

        let count = self.band_count(gradient, context);
        (0..count)
            .map(|i| {
                let t = i as f64 / (count - 1) as f64;
                GradientBand {
                    start: i as f64 / count as f64,
                    end: (i + 1) as f64 / count as f64,
                    color: sample(&stops, t).to_hex(),
                }
            })
            .collect()
    }
}

/// Colour at `t` in `0.0..=1.0` across evenly spaced stops.
fn sample(stops: &[Color], t: f64) -> Color {
    let segments = (stops.len() - 1) as f64;
    let position = t.clamp(0.0, 1.0) * segments;
    let index = (position.floor() as usize).min(stops.len() - 2);
    stops[index].blend(&stops[index + 1], (position - index as f64) as f32)
}

impl EffectProcessor for GradientProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::Gradient
    }

    fn process(&self, value: &StyleValue, context: &EffectContext) -> Option<EffectRecipe> {
        let gradient = match value {
            StyleValue::Gradient(gradient) => gradient.clone(),
            StyleValue::Map(map) => Gradient::from_partial(map)?,
            _ => {
                log::warn!("Ignoring gradient value {}", value);
                return None;
            }
        };
        let fallback = gradient.colors.first().cloned()?;
        Some(EffectRecipe::Gradient {
            kind: gradient.kind,
            direction: gradient.direction.clone(),
            bands: self.bands(&gradient, context),
            fallback,
        })
    }
}
