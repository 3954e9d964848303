//! Builder for [`SeqHandler`](crate::seq_handler::SeqHandler).
//!
//! Exposes the server address, API key, request timeout, rendered
//! parameters, environment source, and error handler. Every field is
//! optional: a builder with no server URL yields a handler that accepts
//! batches and silently discards them.

use std::{fmt, sync::Arc, time::Duration};

use crate::environment::{EnvironmentSource, StaticEnvironment};
use crate::error_handler::ErrorHandler;
use crate::parameter::Parameter;
use crate::seq_handler::{SeqHandler, SeqHandlerConfig};

use super::builder_macros::{ensure_positive, option_setter};
use super::{HandlerBuildError, HandlerBuilderTrait, parse_timespan};

/// Builder for constructing [`SeqHandler`] instances.
#[derive(Clone, Default)]
pub struct SeqHandlerBuilder {
    server_url: Option<String>,
    api_key: Option<String>,
    timeout_ms: Option<u64>,
    parameters: Vec<Parameter>,
    environment: Option<Arc<dyn EnvironmentSource>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    warn_interval_ms: Option<u64>,
}

impl SeqHandlerBuilder {
    /// Create a new builder with no server configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base address of the Seq server, e.g. `http://seq:5341`.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the API key sent in the `X-Seq-ApiKey` header.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout. Sub-millisecond spans round up to 1 ms.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let millis = if millis == 0 && !timeout.is_zero() { 1 } else { millis };
        self.timeout_ms = Some(millis);
        self
    }

    option_setter!(
        #[doc = "Set the request timeout in milliseconds."]
        with_timeout_ms,
        timeout_ms,
        u64
    );

    /// Set the request timeout from `TimeSpan` text such as `00:00:30`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerBuildError::InvalidConfig`] when `text` is not a
    /// valid non-negative timespan.
    pub fn with_timeout_str(self, text: &str) -> Result<Self, HandlerBuildError> {
        Ok(self.with_timeout(parse_timespan(text)?))
    }

    /// Append a parameter rendered into every event's properties.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append several parameters, preserving their order.
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Use `source` to resolve the `Environment` property.
    pub fn with_environment(mut self, source: impl EnvironmentSource + 'static) -> Self {
        self.environment = Some(Arc::new(source));
        self
    }

    /// Use a fixed environment name.
    pub fn with_environment_name(self, name: impl Into<String>) -> Self {
        self.with_environment(StaticEnvironment::new(name))
    }

    /// Route delivery failures to `handler` instead of the `log` facade.
    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    option_setter!(
        #[doc = "Set the interval between dropped-event summaries in milliseconds."]
        with_warn_interval_ms,
        warn_interval_ms,
        u64
    );

    fn validate(&self) -> Result<(), HandlerBuildError> {
        self.validate_url()?;
        self.validate_timeouts()?;
        Ok(())
    }

    fn validate_url(&self) -> Result<(), HandlerBuildError> {
        let Some(url) = &self.server_url else {
            return Ok(());
        };
        let url = url.trim();
        if url.is_empty() {
            return Err(HandlerBuildError::InvalidConfig(
                "server URL must not be empty".into(),
            ));
        }
        let lower = url.to_ascii_lowercase();
        let rest = lower
            .strip_prefix("http://")
            .or_else(|| lower.strip_prefix("https://"));
        match rest {
            Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
            Some(_) => Err(HandlerBuildError::InvalidConfig(format!(
                "server URL {url:?} has no host"
            ))),
            None => Err(HandlerBuildError::InvalidConfig(format!(
                "server URL {url:?} must use http or https"
            ))),
        }
    }

    fn validate_timeouts(&self) -> Result<(), HandlerBuildError> {
        if let Some(timeout) = self.timeout_ms {
            ensure_positive!(timeout, "timeout_ms")?;
        }
        if let Some(interval) = self.warn_interval_ms {
            ensure_positive!(interval, "warn_interval_ms")?;
        }
        Ok(())
    }

    /// Validate the builder and produce the handler configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerBuildError::InvalidConfig`] for a malformed URL or
    /// a zero timeout.
    pub fn build_config(&self) -> Result<SeqHandlerConfig, HandlerBuildError> {
        self.validate()?;

        let defaults = SeqHandlerConfig::default();
        Ok(SeqHandlerConfig {
            server_url: self.server_url.as_deref().map(|url| url.trim().to_owned()),
            api_key: self.api_key.clone(),
            timeout: self
                .timeout_ms
                .map_or(defaults.timeout, Duration::from_millis),
            parameters: self.parameters.clone(),
            environment: self.environment.clone().unwrap_or(defaults.environment),
            error_handler: self.error_handler.clone().unwrap_or(defaults.error_handler),
            warn_interval: self
                .warn_interval_ms
                .map_or(defaults.warn_interval, Duration::from_millis),
        })
    }

    /// Build the handler.
    ///
    /// # Errors
    ///
    /// See [`build_config`](Self::build_config) and
    /// [`SeqHandler::with_config`].
    pub fn build(&self) -> Result<SeqHandler, HandlerBuildError> {
        self.build_inner()
    }
}

impl HandlerBuilderTrait for SeqHandlerBuilder {
    type Handler = SeqHandler;

    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError> {
        SeqHandler::with_config(self.build_config()?)
    }
}

impl fmt::Debug for SeqHandlerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeqHandlerBuilder")
            .field("server_url", &self.server_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("parameters", &self.parameters)
            .field("custom_environment", &self.environment.is_some())
            .field("custom_error_handler", &self.error_handler.is_some())
            .field("warn_interval_ms", &self.warn_interval_ms)
            .finish()
    }
}
