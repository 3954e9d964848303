//! HTTP transport for Seq payloads.
//!
//! A single `ureq::Agent` is built per handler and reused for every
//! POST, so connections are pooled across sends.

use std::sync::Arc;

use log::debug;
use ureq::{Agent, AgentBuilder};

use super::config::{API_KEY_HEADER, SeqHandlerConfig};
use crate::handler::{Delivery, DeliveryError};
use crate::handlers::HandlerBuildError;

const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Classification of an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// 2xx responses - the batch was accepted.
    Success,
    /// Anything else - report and drop the batch.
    Failure,
}

/// Classify an HTTP status: only 2xx counts as delivered.
pub fn classify_status(status: u16) -> ResponseClass {
    match status {
        200..=299 => ResponseClass::Success,
        _ => ResponseClass::Failure,
    }
}

pub(super) fn build_agent(config: &SeqHandlerConfig) -> Result<Agent, HandlerBuildError> {
    let tls = native_tls::TlsConnector::new()?;
    Ok(AgentBuilder::new()
        .timeout(config.timeout)
        .tls_connector(Arc::new(tls))
        .build())
}

/// POST `payload` to `endpoint` and classify the outcome.
pub(super) fn post_events(
    agent: &Agent,
    endpoint: &str,
    api_key: Option<&str>,
    payload: &str,
) -> Result<Delivery, DeliveryError> {
    let mut request = agent.post(endpoint).set("Content-Type", CONTENT_TYPE);
    if let Some(key) = api_key {
        request = request.set(API_KEY_HEADER, key);
    }

    match request.send_string(payload) {
        Ok(response) => {
            let status = response.status();
            let body = read_body(response);
            match classify_status(status) {
                ResponseClass::Success => {
                    debug!("SeqHandler delivered batch ({status})");
                    Ok(Delivery::Delivered { status })
                }
                ResponseClass::Failure => Err(DeliveryError::FailedResult { status, body }),
            }
        }
        Err(ureq::Error::Status(status, response)) => Err(DeliveryError::FailedResult {
            status,
            body: read_body(response),
        }),
        Err(ureq::Error::Transport(err)) => Err(DeliveryError::Transport(err.to_string())),
    }
}

// Reading the body to the end also returns the connection to the pool.
fn read_body(response: ureq::Response) -> String {
    response.into_string().unwrap_or_default()
}
