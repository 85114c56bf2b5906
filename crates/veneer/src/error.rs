use thiserror::Error;

/// Errors a render target reports while being configured.
///
/// These never abort a style application: the controller records the rejected
/// property and keeps applying the rest.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    #[error("Unsupported property '{property}'")]
    UnsupportedProperty { property: String },

    #[error("Invalid value for '{property}': {value} ({reason})")]
    InvalidValue {
        property: String,
        value: String,
        reason: String,
    },

    #[error("Could not create '{widget_type}' target: {reason}")]
    CreateFailed { widget_type: String, reason: String },
}

impl SinkError {
    pub fn unsupported(property: impl Into<String>) -> Self {
        Self::UnsupportedProperty {
            property: property.into(),
        }
    }

    pub fn invalid(property: impl Into<String>, value: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by an event handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Handler for '{event}' failed: {message}")]
pub struct HandlerError {
    pub event: String,
    pub message: String,
}

impl HandlerError {
    pub fn new(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            message: message.into(),
        }
    }
}
