use std::f64::consts::FRAC_PI_2;

use vss::StyleValue;

use super::{EffectContext, EffectKind, EffectProcessor, EffectRecipe};

/// Outlines the target's bounds as a rounded rectangle.
#[derive(Clone, Debug)]
pub struct RadiusProcessor {
    /// Straight segments per corner arc.
    segments: usize,
}

impl Default for RadiusProcessor {
    fn default() -> Self {
        Self { segments: 4 }
    }
}

impl RadiusProcessor {
    pub fn with_segments(segments: usize) -> Self {
        Self {
            segments: segments.max(1),
        }
    }

    /// Clockwise outline starting where the top edge meets the top-right corner.
    pub fn outline(&self, width: f64, height: f64, radius: f64) -> Vec<(f64, f64)> {
        if width <= 0.0 || height <= 0.0 {
            return Vec::new();
        }
        let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
        let corners = [
            (width - r, r, -FRAC_PI_2),
            (width - r, height - r, 0.0),
            (r, height - r, FRAC_PI_2),
            (r, r, 2.0 * FRAC_PI_2),
        ];

        let mut points = Vec::with_capacity(4 * (self.segments + 1));
        for (cx, cy, start) in corners {
            for step in 0..=self.segments {
                let angle = start + FRAC_PI_2 * step as f64 / self.segments as f64;
                points.push((snap(cx + r * angle.cos()), snap(cy + r * angle.sin())));
            }
        }
        points
    }
}

fn snap(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

impl EffectProcessor for RadiusProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::Radius
    }

    fn process(&self, value: &StyleValue, context: &EffectContext) -> Option<EffectRecipe> {
        let Some(radius) = value.as_number() else {
            log::warn!("Ignoring radius value {}", value);
            return None;
        };
        if radius <= 0.0 {
            return None;
        }
        Some(EffectRecipe::RoundedRect {
            radius,
            width: context.width,
            height: context.height,
            points: self.outline(context.width, context.height, radius),
            fill: context.background.clone(),
        })
    }
}
