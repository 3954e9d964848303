//! Public handler type exported by the crate.

use log::warn;
use parking_lot::Mutex;
use ureq::Agent;

use crate::{
    environment::ENVIRONMENT_PROPERTY,
    handler::{BatchHandler, Delivery, DeliveryError},
    handlers::HandlerBuildError,
    log_event::LoggingEvent,
    rate_limited_warner::RateLimitedWarner,
};

use super::{
    config::SeqHandlerConfig,
    serialise::encode_payload,
    transport::{build_agent, post_events},
};

/// Handler delivering event batches to a Seq server.
///
/// Each [`send_buffer`](BatchHandler::send_buffer) call encodes the batch
/// and performs one blocking POST. Failures are reported through the
/// configured error handler and the batch is dropped; there are no
/// retries.
pub struct SeqHandler {
    config: SeqHandlerConfig,
    endpoint: Option<String>,
    agent: Mutex<Option<Agent>>,
    warner: RateLimitedWarner,
}

impl SeqHandler {
    /// Construct the handler from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerBuildError::Tls`] if the platform TLS connector
    /// cannot be created.
    pub fn with_config(config: SeqHandlerConfig) -> Result<Self, HandlerBuildError> {
        let agent = build_agent(&config)?;
        let endpoint = config.endpoint();
        let warner = RateLimitedWarner::new(config.warn_interval);
        Ok(Self {
            config,
            endpoint,
            agent: Mutex::new(Some(agent)),
            warner,
        })
    }

    pub fn config(&self) -> &SeqHandlerConfig {
        &self.config
    }

    /// Full URL events are posted to, if a server is configured.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Deliver a batch and return the outcome.
    ///
    /// Sets the `Environment` property on every event before encoding.
    /// Returns [`Delivery::Skipped`] without touching the events when no
    /// server is configured or the batch is empty.
    ///
    /// # Errors
    ///
    /// * [`DeliveryError::Closed`] - the handler was closed.
    /// * [`DeliveryError::Encode`] - the batch could not be serialised.
    /// * [`DeliveryError::FailedResult`] - the server answered non-2xx.
    /// * [`DeliveryError::Transport`] - connection failure or timeout.
    pub fn deliver(&self, events: &mut [LoggingEvent]) -> Result<Delivery, DeliveryError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Ok(Delivery::Skipped);
        };
        if events.is_empty() {
            return Ok(Delivery::Skipped);
        }
        let agent = self.agent.lock().clone().ok_or(DeliveryError::Closed)?;

        let environment = self.config.environment.environment_name();
        for event in events.iter_mut() {
            event.set_property(ENVIRONMENT_PROPERTY, environment.as_str());
        }

        let payload =
            encode_payload(events, &self.config.parameters).map_err(DeliveryError::Encode)?;
        post_events(
            &agent,
            endpoint,
            self.config.effective_api_key(),
            &payload,
        )
    }

    /// Release the HTTP agent and report any pending drop summary.
    pub fn close(&self) {
        if self.agent.lock().take().is_none() {
            return;
        }
        self.warner.flush(|count| {
            warn!("SeqHandler dropped {count} events before close");
        });
    }

    pub fn is_closed(&self) -> bool {
        self.agent.lock().is_none()
    }

    fn report(&self, err: &DeliveryError, dropped: usize) {
        self.config.error_handler.error(&err.to_string());
        self.warner
            .record_drops(u64::try_from(dropped).unwrap_or(u64::MAX));
        self.warner.warn_if_due(|count| {
            warn!("SeqHandler dropped {count} events in the last interval");
        });
    }
}

impl BatchHandler for SeqHandler {
    fn send_buffer(&self, events: &mut [LoggingEvent]) {
        if let Err(err) = self.deliver(events) {
            self.report(&err, events.len());
        }
    }

    fn close(&self) {
        SeqHandler::close(self);
    }
}

impl Drop for SeqHandler {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SeqHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeqHandler")
            .field("endpoint", &self.endpoint)
            .field("closed", &self.is_closed())
            .finish()
    }
}
