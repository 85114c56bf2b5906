use veneer::{
    EffectContext, EffectKind, EffectProcessor, EffectProcessors, EffectRecipe, EffectSet, GradientProcessor,
    ShadowProcessor,
};
use vss::{Gradient, GradientKind, Shadow, StyleValue, style};

fn context(bg: &str, width: f64, height: f64) -> EffectContext {
    EffectContext {
        background: Some(bg.to_string()),
        width,
        height,
    }
}

/// Draws every shadow as a single flat layer.
struct FlatShadow;

impl EffectProcessor for FlatShadow {
    fn kind(&self) -> EffectKind {
        EffectKind::Shadow
    }

    fn process(&self, value: &StyleValue, _context: &EffectContext) -> Option<EffectRecipe> {
        let shadow = value.as_shadow()?;
        Some(EffectRecipe::Shadow {
            layers: vec![veneer::ShadowLayer {
                dx: shadow.offset.0,
                dy: shadow.offset.1,
                spread: 0.0,
                color: shadow.color.clone(),
            }],
        })
    }
}

#[test]
fn test_custom_processor_replaces_standard() {
    let processors = EffectProcessors::standard().with_processor(Box::new(FlatShadow));
    let shadow = processors.get(EffectKind::Shadow).unwrap();
    let recipe = shadow
        .process(&Shadow::default().into(), &EffectContext::default())
        .unwrap();

    match recipe {
        EffectRecipe::Shadow { layers } => assert_eq!(layers.len(), 1),
        other => panic!("unexpected recipe {:?}", other),
    }
    assert!(processors.get(EffectKind::Radius).is_some());
}

#[test]
fn test_shadow_from_partial_map() {
    let value = StyleValue::Map(style! { "color" => "#000000", "blur" => 2 });
    let recipe = ShadowProcessor::default()
        .process(&value, &context("#ffffff", 10.0, 10.0))
        .unwrap();

    let EffectRecipe::Shadow { layers } = recipe else {
        panic!("expected a shadow recipe");
    };
    assert_eq!(layers.len(), 2);
    assert_eq!((layers[0].dx, layers[0].dy), (2.0, 2.0));
    assert_eq!(layers[0].color, "#808080");
    assert_eq!(layers[1].color, "#000000");
}

#[test]
fn test_shadow_layers_capped() {
    let shadow = Shadow {
        blur: 40.0,
        ..Shadow::default()
    };
    let recipe = ShadowProcessor::with_max_layers(5)
        .process(&shadow.into(), &EffectContext::default())
        .unwrap();
    assert!(matches!(recipe, EffectRecipe::Shadow { ref layers } if layers.len() == 5));
}

#[test]
fn test_shadow_with_named_colour_is_single_layer() {
    let shadow = Shadow {
        color: "SystemButtonShadow".to_string(),
        ..Shadow::default()
    };
    let recipe = ShadowProcessor::default()
        .process(&shadow.into(), &EffectContext::default())
        .unwrap();
    let EffectRecipe::Shadow { layers } = recipe else {
        panic!("expected a shadow recipe");
    };
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].color, "SystemButtonShadow");
}

#[test]
fn test_horizontal_gradient_uses_width() {
    let gradient = Gradient {
        direction: "horizontal".to_string(),
        ..Gradient::linear(vec!["#ff0000".to_string(), "#0000ff".to_string()])
    };
    let recipe = GradientProcessor::default()
        .process(&gradient.into(), &context("#ffffff", 6.0, 100.0))
        .unwrap();

    let EffectRecipe::Gradient { direction, bands, .. } = recipe else {
        panic!("expected a gradient recipe");
    };
    assert_eq!(direction, "horizontal");
    assert_eq!(bands.len(), 6);
    assert_eq!(bands[5].color, "#0000ff");
}

#[test]
fn test_radial_gradient() {
    let gradient = Gradient {
        kind: GradientKind::Radial,
        ..Gradient::linear(vec!["#ffffff".to_string(), "#000000".to_string()])
    };
    let recipe = GradientProcessor::default()
        .process(&gradient.into(), &context("#ffffff", 20.0, 10.0))
        .unwrap();

    let EffectRecipe::Gradient { kind, bands, .. } = recipe else {
        panic!("expected a gradient recipe");
    };
    assert_eq!(kind, GradientKind::Radial);
    assert_eq!(bands.len(), 5);
}

#[test]
fn test_unsized_gradient_gets_default_bands() {
    let value = StyleValue::Map(style! { "colors" => vec!["#000000", "#ffffff"] });
    let recipe = GradientProcessor::default()
        .process(&value, &EffectContext::default())
        .unwrap();
    assert!(matches!(recipe, EffectRecipe::Gradient { ref bands, .. } if bands.len() == 16));
}

#[test]
fn test_gradient_with_one_stop_is_cleared() {
    let value = StyleValue::Map(style! { "colors" => vec!["#000000"] });
    assert_eq!(GradientProcessor::default().process(&value, &EffectContext::default()), None);
}

#[test]
fn test_effect_set() {
    let set = EffectSet::empty().with(EffectKind::Gradient).with(EffectKind::Shadow);
    assert!(set.has(EffectKind::Shadow));
    assert!(!set.has(EffectKind::Radius));
    assert_eq!(set.kinds().collect::<Vec<_>>(), vec![EffectKind::Shadow, EffectKind::Gradient]);
}
