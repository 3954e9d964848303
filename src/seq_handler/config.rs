//! Configuration consumed by the Seq handler.
//!
//! `SeqHandlerBuilder` constructs these values before passing them to
//! [`SeqHandler`](super::SeqHandler) for runtime use. The configuration
//! is immutable once the handler is built.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::environment::{EnvironmentSource, StaticEnvironment};
use crate::error_handler::{ErrorHandler, LogErrorHandler};
use crate::parameter::Parameter;
use crate::rate_limited_warner::DEFAULT_WARN_INTERVAL;

/// Default timeout applied to each POST.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);
/// Path of the raw-events endpoint relative to the server URL.
pub const RAW_EVENTS_RESOURCE: &str = "api/events/raw";
/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-Seq-ApiKey";

#[derive(Clone)]
pub struct SeqHandlerConfig {
    /// Base address of the Seq server. `None` disables delivery.
    pub server_url: Option<String>,
    /// API key sent with each request when present.
    pub api_key: Option<String>,
    /// Timeout for a single POST, connect included.
    pub timeout: Duration,
    /// Parameters rendered into every event's properties.
    pub parameters: Vec<Parameter>,
    /// Source of the `Environment` property.
    pub environment: Arc<dyn EnvironmentSource>,
    /// Channel for delivery failures.
    pub error_handler: Arc<dyn ErrorHandler>,
    /// Interval between dropped-event summaries.
    pub warn_interval: Duration,
}

impl SeqHandlerConfig {
    /// Full URL of the raw-events endpoint, if a server is configured.
    pub fn endpoint(&self) -> Option<String> {
        self.server_url
            .as_deref()
            .map(|base| format!("{}{RAW_EVENTS_RESOURCE}", normalise_server_url(base)))
    }

    /// The API key, unless it is empty or whitespace.
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

/// Ensure the base address ends with `/` so relative paths append.
pub fn normalise_server_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_owned()
    } else {
        format!("{url}/")
    }
}

impl Default for SeqHandlerConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            parameters: Vec::new(),
            environment: Arc::new(StaticEnvironment::default()),
            error_handler: Arc::new(LogErrorHandler),
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }
}

impl fmt::Debug for SeqHandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeqHandlerConfig")
            .field("server_url", &self.server_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("parameters", &self.parameters)
            .field("warn_interval", &self.warn_interval)
            .finish_non_exhaustive()
    }
}
