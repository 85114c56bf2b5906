use std::rc::Rc;

use veneer::testing::RecordingSink;
use veneer::{
    EffectKind, EffectProcessors, EffectRecipe, InteractionEvent, RadiusProcessor, SinkError, StyleController,
    WidgetKind, WidgetVariant,
};
use vss::{Color, Font, FontWeight, StyleCascadeResolver, StyleValue, ThemeRegistry, style};

fn controller_with(kind: WidgetKind, effects: EffectProcessors) -> StyleController {
    let registry = ThemeRegistry::with_builtin_themes().into_shared();
    StyleController::new(
        kind.type_name(),
        kind.default_style(),
        Rc::new(StyleCascadeResolver::new(registry)),
        Rc::new(effects),
    )
}

fn controller(kind: WidgetKind) -> StyleController {
    controller_with(kind, EffectProcessors::standard())
}

#[test]
fn test_primitives_reach_the_sink() {
    let mut controller = controller(WidgetKind::Button);
    let mut sink = RecordingSink::new("button");
    let report = controller.apply(&mut sink).unwrap();

    assert!(report.is_clean());
    assert_eq!(sink.property("bg"), Some(&StyleValue::from("#f8f9fa")));
    assert_eq!(sink.property("padx"), Some(&StyleValue::Number(12.0)));
    assert_eq!(sink.property("pady"), Some(&StyleValue::Number(6.0)));
    assert_eq!(sink.property("relief"), Some(&StyleValue::from("flat")));
    assert_eq!(
        sink.property("font"),
        Some(&StyleValue::Font(Font::new("Segoe UI", 9.0, FontWeight::Normal)))
    );

    // Effect descriptors are never configured directly.
    assert_eq!(sink.property("shadow"), None);
    assert_eq!(sink.property("radius"), None);
    assert!(!report.configured.iter().any(|p| p == "shadow"));
}

#[test]
fn test_one_rejected_property_does_not_block_the_rest() {
    let mut controller = controller(WidgetKind::Button);
    let mut sink = RecordingSink::new("button").rejecting(["cursor", "border_color"]);
    let report = controller.apply(&mut sink).unwrap();

    let rejected: Vec<&str> = report.rejected.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(rejected.len(), 2);
    assert!(rejected.contains(&"cursor"));
    assert!(rejected.contains(&"border_color"));
    assert_eq!(report.rejected[0].1, SinkError::unsupported(rejected[0]));

    assert_eq!(sink.property("bg"), Some(&StyleValue::from("#f8f9fa")));
    assert_eq!(sink.property("cursor"), None);
    assert!(!controller.is_dirty());
}

#[test]
fn test_button_effects_are_drawn() {
    let mut controller = controller(WidgetKind::Button);
    let mut sink = RecordingSink::new("button").with_size(100.0, 30.0);
    let report = controller.apply(&mut sink).unwrap();

    assert_eq!(report.effects.len(), 2);
    let mut active = sink.active_effects();
    active.sort_by_key(|k| k.property());
    assert_eq!(active, vec![EffectKind::Radius, EffectKind::Shadow]);

    let rounded = report
        .effects
        .iter()
        .find_map(|r| match r {
            EffectRecipe::RoundedRect { radius, width, height, points, fill } => {
                Some((*radius, *width, *height, points.len(), fill.clone()))
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(rounded, (4.0, 100.0, 30.0, 20, Some("#f8f9fa".to_string())));

    let layers = report
        .effects
        .iter()
        .find_map(|r| match r {
            EffectRecipe::Shadow { layers } => Some(layers.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(layers.len(), 3);
    assert!(layers.iter().all(|l| (l.dx, l.dy) == (0.0, 1.0)));
    let background = Color::parse("#f8f9fa").unwrap();
    let innermost = Color::parse(&layers[2].color).unwrap();
    assert!(innermost.luminance() < background.luminance());
}

#[test]
fn test_removed_effect_is_cleared() {
    let mut controller = controller(WidgetKind::Button);
    let mut sink = RecordingSink::new("button").with_size(80.0, 24.0);
    controller.apply(&mut sink).unwrap();

    controller.update_style(style! { "shadow" => false, "radius" => 0 });
    let report = controller.apply(&mut sink).unwrap();

    let mut cleared: Vec<EffectKind> = report
        .effects
        .iter()
        .filter_map(|r| match r {
            EffectRecipe::Clear(kind) => Some(*kind),
            _ => None,
        })
        .collect();
    cleared.sort_by_key(|k| k.property());
    assert_eq!(cleared, vec![EffectKind::Radius, EffectKind::Shadow]);
    assert!(sink.active_effects().is_empty());
    assert!(controller.drawn_effects().is_empty());
}

#[test]
fn test_clear_is_sent_once() {
    let mut controller = controller(WidgetKind::Button);
    let mut sink = RecordingSink::new("button");
    controller.apply(&mut sink).unwrap();
    controller.update_style(style! { "shadow" => false });

    let first = controller.apply(&mut sink).unwrap();
    let second = controller.apply(&mut sink).unwrap();
    assert!(first.effects.contains(&EffectRecipe::Clear(EffectKind::Shadow)));
    assert!(!second.effects.contains(&EffectRecipe::Clear(EffectKind::Shadow)));
}

#[test]
fn test_gradient_uses_sink_height() {
    let mut controller = controller(WidgetKind::Frame);
    controller.set_style(style! { "gradient" => vec!["#000000", "#ffffff"] });
    let mut sink = RecordingSink::new("frame").with_size(50.0, 4.0);
    let report = controller.apply(&mut sink).unwrap();

    let (bands, fallback) = report
        .effects
        .iter()
        .find_map(|r| match r {
            EffectRecipe::Gradient { bands, fallback, .. } => Some((bands.clone(), fallback.clone())),
            _ => None,
        })
        .unwrap();
    assert_eq!(bands.len(), 4);
    assert_eq!(bands[0].color, "#000000");
    assert_eq!(bands[3].color, "#ffffff");
    assert_eq!(fallback, "#000000");
}

#[test]
fn test_dimensions_fall_back_to_resolved_style() {
    let mut controller = controller(WidgetKind::ProgressBar);
    controller.set_style(style! { "radius" => 6 });
    let mut sink = RecordingSink::new("progressbar");
    let report = controller.apply(&mut sink).unwrap();

    let size = report.effects.iter().find_map(|r| match r {
        EffectRecipe::RoundedRect { width, height, .. } => Some((*width, *height)),
        _ => None,
    });
    assert_eq!(size, Some((200.0, 20.0)));
}

#[test]
fn test_margin_is_reported_not_configured() {
    let mut controller = controller(WidgetKind::Label);
    controller.set_style(style! { "margin" => "4 8" });
    let mut sink = RecordingSink::new("label");
    let report = controller.apply(&mut sink).unwrap();

    assert_eq!(report.layout, vec!["margin".to_string()]);
    assert_eq!(sink.property("margin"), None);
}

#[test]
fn test_missing_processor_skips_effect() {
    let mut controller = controller_with(
        WidgetKind::Button,
        EffectProcessors::empty().with_processor(Box::new(RadiusProcessor::with_segments(1))),
    );
    let mut sink = RecordingSink::new("button").with_size(40.0, 20.0);
    let report = controller.apply(&mut sink).unwrap();

    assert_eq!(sink.active_effects(), vec![EffectKind::Radius]);
    assert_eq!(report.effects.len(), 1);
}

#[test]
fn test_sink_refusing_an_effect() {
    let mut controller = controller(WidgetKind::Button);
    let mut sink = RecordingSink::new("button").rejecting(["shadow"]);
    let report = controller.apply(&mut sink).unwrap();

    assert!(report.rejected.iter().any(|(p, _)| p == "shadow"));
    assert_eq!(sink.active_effects(), vec![EffectKind::Radius]);
}

#[test]
fn test_state_change_reapplies_changed_colour() {
    let mut controller = controller(WidgetKind::Button);
    let mut sink = RecordingSink::new("button");
    controller.apply(&mut sink).unwrap();
    sink.clear_log();

    controller.handle(InteractionEvent::PointerEnter);
    assert!(controller.is_dirty());
    controller.apply(&mut sink).unwrap();
    assert_eq!(sink.property("bg"), Some(&StyleValue::from("#e9ecef")));
    assert!(sink.calls().iter().any(|(p, _)| p == "bg"));
}

#[test]
fn test_unparseable_colors_degrade_during_apply() {
    let mut controller = controller(WidgetKind::Button).with_style(style! {
        "bg" => "hsl)(",
        "shadow" => style! { "color" => "hsl)(" },
        "gradient" => vec!["ññ", "#ffffff"],
    });
    let mut sink = RecordingSink::new("button").with_size(100.0, 30.0);
    let report = controller.apply(&mut sink).unwrap();

    assert!(report.is_clean());
    assert_eq!(sink.property("bg"), Some(&StyleValue::from("hsl)(")));

    let mut shadow = None;
    let mut fill = None;
    let mut bands = None;
    for recipe in &report.effects {
        match recipe {
            EffectRecipe::Shadow { layers } => shadow = Some(layers.clone()),
            EffectRecipe::RoundedRect { fill: f, .. } => fill = Some(f.clone()),
            EffectRecipe::Gradient { bands: b, .. } => bands = Some(b.clone()),
            EffectRecipe::Clear(_) => {}
        }
    }

    let shadow = shadow.unwrap();
    assert_eq!(shadow.len(), 1);
    assert_eq!(shadow[0].color, "hsl)(");
    assert_eq!((shadow[0].dx, shadow[0].dy), (0.0, 1.0));
    assert_eq!(fill, Some(Some("hsl)(".to_string())));

    let colors: Vec<String> = bands.unwrap().into_iter().map(|b| b.color).collect();
    assert_eq!(colors, ["ññ", "#ffffff"]);
}
