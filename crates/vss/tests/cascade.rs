use vss::{
    CascadeLayers, Font, ResolverOptions, Shadow, StateOverlays, StyleCascadeResolver, StyleClass, StyleError,
    StyleMap, StyleValue, Theme, ThemeRegistry, WidgetStates, style,
};

fn resolver() -> (vss::SharedRegistry, StyleCascadeResolver) {
    let registry = ThemeRegistry::with_builtin_themes().into_shared();
    let resolver = StyleCascadeResolver::new(registry.clone());
    (registry, resolver)
}

#[test]
fn test_token_resolution() {
    let theme = Theme::new("tokens").with_color("primary", "#0078d4");
    let resolver = StyleCascadeResolver::detached();
    let local = style! { "bg" => "@colors.primary" };
    let resolved = resolver
        .resolve_with_theme("frame", &CascadeLayers::new().local(&local), Some(&theme))
        .unwrap();
    assert_eq!(resolved.get("bg"), Some(&StyleValue::from("#0078d4")));
}

#[test]
fn test_later_source_wins() {
    let resolver = StyleCascadeResolver::detached();
    let lower = style! { "bg" => "#111111", "fg" => "#222222" };
    let higher = style! { "background" => "#333333" };
    let resolved = resolver.merge_sources(&[&lower, &higher], None).unwrap();
    assert_eq!(resolved.get("bg"), Some(&StyleValue::from("#333333")));
    assert_eq!(resolved.get("fg"), Some(&StyleValue::from("#222222")));
}

#[test]
fn test_shadow_merges_field_by_field() {
    let (_registry, resolver) = resolver();
    let local = style! { "shadow" => style! { "color" => "#ff0000" } };
    let resolved = resolver.resolve("button", &CascadeLayers::new().local(&local)).unwrap();

    let shadow = resolved.get("shadow").and_then(StyleValue::as_shadow).unwrap();
    assert_eq!(shadow.color, "#ff0000");
    assert_eq!(shadow.offset, (0.0, 1.0));
    assert_eq!(shadow.blur, 3.0);
    assert!(shadow.enabled);
}

#[test]
fn test_disabled_shadow_stays_disabled_under_partial_override() {
    let resolver = StyleCascadeResolver::detached();
    let lower = style! { "shadow" => false };
    let higher = style! { "shadow" => style! { "blur" => 8 } };
    let resolved = resolver.merge_sources(&[&lower, &higher], None).unwrap();
    let shadow = resolved.get("shadow").and_then(StyleValue::as_shadow).unwrap();
    assert!(!shadow.enabled);
    assert_eq!(shadow.blur, 8.0);
}

#[test]
fn test_precedence_order() {
    let theme = Theme::new("layers")
        .with_widget_style("*", style! { "bg" => "#000001", "fg" => "#000001", "relief" => "flat" })
        .with_widget_style("button", style! { "fg" => "#000004", "cursor" => "hand2" });
    let defaults = style! { "bg" => "#000003", "fg" => "#000003", "width" => 10 };
    let class = StyleClass::new("c", style! { "cursor" => "arrow", "width" => 20 });
    let local = style! { "width" => 30 };

    let resolved = StyleCascadeResolver::detached()
        .resolve_with_theme(
            "button",
            &CascadeLayers::new().defaults(&defaults).class(&class).local(&local),
            Some(&theme),
        )
        .unwrap();

    assert_eq!(resolved.get("relief"), Some(&StyleValue::from("flat")));
    assert_eq!(resolved.get("bg"), Some(&StyleValue::from("#000003")));
    assert_eq!(resolved.get("fg"), Some(&StyleValue::from("#000004")));
    assert_eq!(resolved.get("cursor"), Some(&StyleValue::from("arrow")));
    assert_eq!(resolved.get("width"), Some(&StyleValue::Number(30.0)));
    assert_eq!(resolved.get("font"), Some(&StyleValue::Font(Font::default())));
}

#[test]
fn test_padding_from_cascade() {
    let resolver = StyleCascadeResolver::detached();
    let resolved = resolver.merge_sources(&[&style! { "padding" => 12 }], None).unwrap();
    assert_eq!(resolved.get("padx"), Some(&StyleValue::Number(12.0)));
    assert_eq!(resolved.get("pady"), Some(&StyleValue::Number(12.0)));
}

#[test]
fn test_state_tie_break() {
    let resolver = StyleCascadeResolver::detached();
    let local = style! {
        "bg" => "#ffffff",
        "hover_bg" => "#eeeeee",
        "focused" => style! { "bg" => "#dddddd" },
        "disabled_bg" => "#cccccc",
    };

    let resolve = |states| {
        resolver
            .resolve_with_theme("entry", &CascadeLayers::new().local(&local).states(states), None)
            .unwrap()
            .get("bg")
            .cloned()
    };

    assert_eq!(resolve(WidgetStates::empty()), Some(StyleValue::from("#ffffff")));
    assert_eq!(resolve(WidgetStates::HOVER), Some(StyleValue::from("#eeeeee")));
    assert_eq!(resolve(WidgetStates::HOVER | WidgetStates::FOCUS), Some(StyleValue::from("#dddddd")));
    assert_eq!(resolve(WidgetStates::all()), Some(StyleValue::from("#cccccc")));
}

#[test]
fn test_state_overlays_never_leak_as_keys() {
    let resolver = StyleCascadeResolver::detached();
    let local = style! { "hover_bg" => "#eeeeee", "active" => style! { "relief" => "sunken" } };
    let resolved = resolver
        .resolve_with_theme("button", &CascadeLayers::new().local(&local), None)
        .unwrap();
    assert!(!resolved.contains_key("hover_bg"));
    assert!(!resolved.contains_key("active"));
    assert!(!resolved.contains_key("bg"));
}

#[test]
fn test_local_overlays_win_over_source_overlays() {
    let resolver = StyleCascadeResolver::detached();
    let local = style! { "hover_bg" => "#eeeeee" };
    let mut extra = StateOverlays::new();
    extra.insert(WidgetStates::HOVER, "backgroundColor", "#abcdef");

    let layers = CascadeLayers::new()
        .local(&local)
        .overlays(&extra)
        .states(WidgetStates::HOVER);
    let resolved = resolver.resolve_with_theme("button", &layers, None).unwrap();
    assert_eq!(resolved.get("bg"), Some(&StyleValue::from("#abcdef")));
}

#[test]
fn test_theme_switch_changes_background() {
    let (registry, resolver) = resolver();
    let local = style! { "bg" => "@colors.background" };
    let layers = CascadeLayers::new().local(&local);

    let light = resolver.resolve("frame", &layers).unwrap();
    registry.borrow_mut().activate("dark").unwrap();
    let dark = resolver.resolve("frame", &layers).unwrap();

    assert_eq!(light.get("bg"), Some(&StyleValue::from("#ffffff")));
    assert_eq!(dark.get("bg"), Some(&StyleValue::from("#1e1e1e")));
}

#[test]
fn test_theme_widget_tokens_expand() {
    let (_registry, resolver) = resolver();
    let resolved = resolver.resolve("entry", &CascadeLayers::new()).unwrap();

    assert_eq!(resolved.get("font"), Some(&StyleValue::Font(Font::new("Segoe UI", 9.0, "normal"))));
    assert_eq!(resolved.get("radius"), Some(&StyleValue::Number(4.0)));
    assert_eq!(resolved.get("border_color"), Some(&StyleValue::from("#dee2e6")));
    assert_eq!(resolved.get("placeholder_fg"), Some(&StyleValue::from("#adb5bd")));
}

#[test]
fn test_unresolved_tokens_stay_literal() {
    let (_registry, resolver) = resolver();
    let local = style! { "bg" => "@colors.nope", "radius" => "@borders.nope" };
    let resolved = resolver.resolve("frame", &CascadeLayers::new().local(&local)).unwrap();
    assert_eq!(resolved.get("bg"), Some(&StyleValue::from("@colors.nope")));
    assert_eq!(resolved.get("radius"), Some(&StyleValue::from("@borders.nope")));
}

#[test]
fn test_chained_tokens_resolve_one_level() {
    let theme = Theme::new("chain")
        .with_section("borders", style! { "radius" => 4 })
        .with_section("alias", style! { "radius" => "@borders.radius" });
    let local = style! { "radius" => "@alias.radius" };
    let resolved = StyleCascadeResolver::detached()
        .resolve_with_theme("frame", &CascadeLayers::new().local(&local), Some(&theme))
        .unwrap();
    assert_eq!(resolved.get("radius"), Some(&StyleValue::from("@borders.radius")));
}

#[test]
fn test_resolution_is_idempotent() {
    let (registry, resolver) = resolver();
    let local = style! {
        "backgroundColor" => "@colors.primary",
        "fg" => (255, 255, 255),
        "padding" => (1, 2, 3, 4),
        "margin" => 4,
        "fontSize" => 14,
        "shadow" => true,
        "gradient" => vec!["@colors.primary", "#0af"],
        "border" => "1 solid #ccc",
        "bg_unknown" => "@colors.missing",
    };
    let resolved = resolver.resolve("button", &CascadeLayers::new().local(&local)).unwrap();
    let theme = registry.borrow().current();
    let again = resolver.merge_sources(&[&resolved], theme.as_deref()).unwrap();
    assert_eq!(again, resolved);

    let gradient = resolved.get("gradient").and_then(StyleValue::as_gradient).unwrap();
    assert_eq!(gradient.colors, vec!["#0078d4".to_string(), "#00aaff".to_string()]);
    assert_eq!(resolved.get("fg"), Some(&StyleValue::from("#ffffff")));
    assert_eq!(resolved.get("border_color"), Some(&StyleValue::from("#cccccc")));
}

#[test]
fn test_graceful_degradation() {
    let resolver = StyleCascadeResolver::detached();
    let local = style! { "font_size" => "abc", "bg" => "#ffffff", "border_width" => "wide", "cursor" => "hand2" };
    let resolved = resolver
        .resolve_with_theme("label", &CascadeLayers::new().local(&local), None)
        .unwrap();

    assert_eq!(resolved.get("font").and_then(StyleValue::as_font).map(|f| f.size), Some(10.0));
    assert_eq!(resolved.get("border_width"), Some(&StyleValue::Number(0.0)));
    assert_eq!(resolved.get("bg"), Some(&StyleValue::from("#ffffff")));
    assert_eq!(resolved.get("cursor"), Some(&StyleValue::from("hand2")));
}

#[test]
fn test_strict_mode_surfaces_errors() {
    let resolver = StyleCascadeResolver::with_options(
        None,
        ResolverOptions {
            strict: true,
            color_cache: true,
        },
    );
    let local = style! { "font_size" => "abc" };
    let err = resolver
        .resolve_with_theme("label", &CascadeLayers::new().local(&local), None)
        .unwrap_err();
    assert!(matches!(err, StyleError::MalformedStyleValue { .. }));
}

#[test]
fn test_style_class_inheritance_scenario() {
    let primary = StyleClass::builder("Primary")
        .set("bg", "#0078d4")
        .set("font", ("Segoe UI", 11, "bold"))
        .set("radius", 6)
        .set("padding", (12, 6))
        .build();
    let secondary = StyleClass::builder("Secondary")
        .parent(&primary)
        .set("backgroundColor", "#6c757d")
        .build();

    let resolved = StyleCascadeResolver::detached()
        .resolve_with_theme("button", &CascadeLayers::new().class(&secondary), None)
        .unwrap();

    assert_eq!(resolved.get("bg"), Some(&StyleValue::from("#6c757d")));
    assert_eq!(resolved.get("font"), Some(&StyleValue::Font(Font::new("Segoe UI", 11.0, "bold"))));
    assert_eq!(resolved.get("radius"), Some(&StyleValue::Number(6.0)));
    assert_eq!(resolved.get("padx"), Some(&StyleValue::Number(12.0)));
    assert_eq!(resolved.get("pady"), Some(&StyleValue::Number(6.0)));
}

#[test]
fn test_parentless_class_uses_own_attributes() {
    let class = StyleClass::new("Solo", style! { "fg" => "#123456" });
    let flat = class.flatten().unwrap();
    assert_eq!(flat, style! { "fg" => "#123456" });
}

#[test]
fn test_partial_font_completes_against_lower_layers() {
    let resolver = StyleCascadeResolver::detached();
    let lower = style! { "font" => ("Inter", 14, "bold") };
    let higher = style! { "fontWeight" => "normal" };
    let resolved = resolver.merge_sources(&[&lower, &higher], None).unwrap();
    assert_eq!(resolved.get("font"), Some(&StyleValue::Font(Font::new("Inter", 14.0, "normal"))));
}

#[test]
fn test_unknown_widget_type_is_not_an_error() {
    let (_registry, resolver) = resolver();
    let resolved: StyleMap = resolver.resolve("sparkline", &CascadeLayers::new()).unwrap();
    assert_eq!(resolved.get("border_width"), Some(&StyleValue::Number(0.0)));
    assert!(resolved.get("shadow").is_none());
}

#[test]
fn test_color_cache_dropped_on_generation_change() {
    let (registry, resolver) = resolver();
    let local = style! { "bg" => "@colors.primary" };
    resolver.resolve("frame", &CascadeLayers::new().local(&local)).unwrap();
    assert!(resolver.color_resolver().cached_entries() > 0);

    registry.borrow_mut().register("default", Theme::new("default").with_color("primary", "#abcdef"));
    let resolved = resolver.resolve("frame", &CascadeLayers::new().local(&local)).unwrap();
    assert_eq!(resolved.get("bg"), Some(&StyleValue::from("#abcdef")));
    assert_eq!(resolver.generation(), registry.borrow().generation());
}

#[test]
fn test_shadow_default_color_resolves() {
    let resolved = StyleCascadeResolver::detached()
        .merge_sources(&[&style! { "shadow" => true }], None)
        .unwrap();
    assert_eq!(resolved.get("shadow"), Some(&StyleValue::Shadow(Shadow::default())));
}

#[test]
fn test_non_ascii_colors_pass_through() {
    let (_registry, resolver) = resolver();
    let local = style! { "bg" => "ññ", "fg" => "rgbé", "border_color" => "hsl)(" };
    for theme in [None, resolver.current_theme()] {
        let resolved = resolver
            .resolve_with_theme("label", &CascadeLayers::new().local(&local), theme.as_deref())
            .unwrap();
        assert_eq!(resolved.get("bg"), Some(&StyleValue::from("ññ")));
        assert_eq!(resolved.get("fg"), Some(&StyleValue::from("rgbé")));
        assert_eq!(resolved.get("border_color"), Some(&StyleValue::from("hsl)(")));
    }
}
