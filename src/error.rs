use thiserror::Error;
use veneer::{HandlerError, SinkError};
use vss::StyleError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Render target error: {0}")]
    Sink(#[from] SinkError),

    #[error("Event handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Global handlers are being dispatched")]
    HandlersBusy,
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
