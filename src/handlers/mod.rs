//! Handler builders and associated traits.
//!
//! Provides a minimal builder API for constructing handlers in a
//! type‑safe manner. Each builder implements [`HandlerBuilderTrait`]
//! and validates its configuration before the handler is created.

use thiserror::Error;

mod builder_macros;
pub mod seq_builder;
mod timespan;

pub use seq_builder::SeqHandlerBuilder;
pub use timespan::parse_timespan;

/// Errors that may occur while building a handler.
#[derive(Debug, Error)]
pub enum HandlerBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid handler configuration: {0}")]
    InvalidConfig(String),
    /// The TLS connector for HTTPS could not be created.
    #[error(transparent)]
    Tls(#[from] native_tls::Error),
}

/// Trait implemented by all handler builders.
pub trait HandlerBuilderTrait: Send + Sync {
    /// Concrete handler produced by the builder.
    type Handler;

    /// Validate the configuration and build the handler instance.
    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError>;
}
