use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use veneer::testing::RecordingSink;
use veneer::{EffectProcessors, InteractionEvent, StyleController, WidgetKind, WidgetVariant};
use vss::{CascadeLayers, ResolverOptions, StyleCascadeResolver, StyleClass, ThemeRegistry, WidgetStates, style};

fn controller(kind: WidgetKind) -> StyleController {
    let registry = ThemeRegistry::with_builtin_themes().into_shared();
    StyleController::new(
        kind.type_name(),
        kind.default_style(),
        Rc::new(StyleCascadeResolver::new(registry)),
        Rc::new(EffectProcessors::standard()),
    )
    .with_style(style! {
        "backgroundColor" => "@colors.surface",
        "padding" => "4 8",
        "hover_bg" => "@colors.light",
        "focused_border_color" => "@colors.primary",
    })
}

fn bench_cold_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_resolution");
    let registry = ThemeRegistry::with_builtin_themes().into_shared();
    let local = style! { "bg" => "@colors.primary", "font" => "@fonts.heading", "shadow" => "@shadows.medium" };
    let class = StyleClass::builder("Card").set("radius", 6).set("padding", (12, 8)).build();

    for (name, cache) in [("color_cache", true), ("no_color_cache", false)] {
        let resolver = StyleCascadeResolver::with_options(
            Some(registry.clone()),
            ResolverOptions {
                color_cache: cache,
                ..Default::default()
            },
        );
        for kind in [WidgetKind::Button, WidgetKind::Entry, WidgetKind::Listbox] {
            let defaults = kind.default_style();
            let layers = CascadeLayers::new()
                .defaults(&defaults)
                .class(&class)
                .local(&local)
                .states(WidgetStates::HOVER | WidgetStates::FOCUS);
            group.bench_with_input(BenchmarkId::new(name, kind.type_name()), &layers, |b, layers| {
                b.iter(|| resolver.resolve(black_box(kind.type_name()), black_box(layers)))
            });
        }
    }

    group.finish();
}

fn bench_memoized_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("memoized_resolution");
    let mut controller = controller(WidgetKind::Button);

    group.bench_function("hover_cycle", |b| {
        b.iter(|| {
            controller.handle(InteractionEvent::PointerEnter);
            black_box(controller.resolved().ok());
            controller.handle(InteractionEvent::PointerLeave);
            black_box(controller.resolved().ok());
        })
    });

    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    let mut controller = controller(WidgetKind::Button);
    let mut sink = RecordingSink::new("button").with_size(120.0, 32.0);

    group.bench_function("button_with_effects", |b| {
        b.iter(|| {
            sink.clear_log();
            black_box(controller.apply(&mut sink).ok());
        })
    });

    group.finish();
}

criterion_group!(benches, bench_cold_resolution, bench_memoized_resolution, bench_apply);
criterion_main!(benches);
