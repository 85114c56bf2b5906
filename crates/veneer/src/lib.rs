//! Widget-side styling for native toolkits.
//!
//! `veneer` connects the [`vss`] cascade to concrete widgets. Each widget owns a
//! [`StyleController`] that tracks its interactive state, resolves its style on
//! every transition, and applies the result to a [`RenderSink`]. Effects the
//! toolkit cannot draw natively (shadows, rounded corners, gradients) are turned
//! into [`EffectRecipe`]s by the [`EffectProcessors`].

pub mod controller;
pub mod effects;
pub mod error;
pub mod events;
mod log_init;
pub mod sink;
pub mod testing;
pub mod widget;

pub use controller::{ApplyReport, InteractionEvent, StyleController, WidgetStyleState};
pub use effects::{
    EffectContext, EffectKind, EffectProcessor, EffectProcessors, EffectRecipe, EffectSet, GradientBand,
    GradientProcessor, RadiusProcessor, ShadowLayer, ShadowProcessor,
};
pub use error::{HandlerError, SinkError};
pub use events::{DispatchReport, EventHandlers, HandlerId, HandlerResult, HandlerTable, SharedHandlers, WidgetEvent};
pub use log_init::init_logger;
pub use sink::{PropertyClass, RenderSink, Toolkit, classify};
pub use widget::{Widget, WidgetContext, WidgetKind, WidgetVariant};

// Re-export the log crate so users can use veneer::log::info!, etc.
pub use log;
pub use vss;
