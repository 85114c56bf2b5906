use vss::{Color, Shadow, StyleValue};

use super::{EffectContext, EffectKind, EffectProcessor, EffectRecipe, ShadowLayer, blendable};

/// Approximates a blurred drop shadow with stacked offset layers.
///
/// Each layer is one pixel larger than the next, and its colour fades from the
/// shadow colour towards the widget background. Translucent shadow colours are
/// composited over the background first.
#[derive(Clone, Debug)]
pub struct ShadowProcessor {
    max_layers: usize,
}

impl Default for ShadowProcessor {
    fn default() -> Self {
        Self { max_layers: 8 }
    }
}

impl ShadowProcessor {
    pub fn with_max_layers(max_layers: usize) -> Self {
        Self {
            max_layers: max_layers.max(1),
        }
    }

    fn layers(&self, shadow: &Shadow, context: &EffectContext) -> Vec<ShadowLayer> {
        let (dx, dy) = shadow.offset;
        let steps = (shadow.blur.round().max(0.0) as usize).clamp(1, self.max_layers);

        let Some(color) = blendable(&shadow.color) else {
            return vec![ShadowLayer {
                dx,
                dy,
                spread: 0.0,
                color: shadow.color.clone(),
            }];
        };
        let background = context.background_color();
        let composited = background.blend(&color, color.a);
        let solid = Color::rgb(composited.r, composited.g, composited.b);

        (0..steps)
            .map(|i| {
                let spread = (steps - 1 - i) as f64;
                let fade = spread as f32 / steps as f32;
                ShadowLayer {
                    dx,
                    dy,
                    spread,
                    color: solid.blend(&background, fade).to_hex(),
                }
            })
            .collect()
    }
}

impl EffectProcessor for ShadowProcessor {
    fn kind(&self) -> EffectKind {
        EffectKind::Shadow
    }

    fn process(&self, value: &StyleValue, context: &EffectContext) -> Option<EffectRecipe> {
        let shadow = match value {
            StyleValue::Shadow(shadow) => shadow.clone(),
            StyleValue::Bool(true) => Shadow::default(),
            StyleValue::Map(map) => Shadow::from_partial(map),
            _ => {
                log::warn!("Ignoring shadow value {}", value);
                return None;
            }
        };
        if !shadow.enabled {
            return None;
        }
        Some(EffectRecipe::Shadow {
            layers: self.layers(&shadow, context),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_fade_to_background() {
        let shadow = Shadow {
            enabled: true,
            color: "#000000".to_string(),
            offset: (2.0, 2.0),
            blur: 4.0,
        };
        let context = EffectContext {
            background: Some("#ffffff".to_string()),
            ..Default::default()
        };
        let layers = ShadowProcessor::default().layers(&shadow, &context);

        assert_eq!(layers.len(), 4);
        assert_eq!(layers[0].spread, 3.0);
        assert_eq!(layers[3].spread, 0.0);
        assert_eq!(layers[3].color, "#000000");
        assert!(layers.iter().all(|l| (l.dx, l.dy) == (2.0, 2.0)));
    }

    #[test]
    fn test_disabled_shadow_clears() {
        let recipe = ShadowProcessor::default().process(&Shadow::disabled().into(), &EffectContext::default());
        assert_eq!(recipe, None);
    }
}
