//! Seq delivery handler implementation.
//!
//! This module defines [`SeqHandler`], a handler that serialises batches
//! of [`LoggingEvent`](crate::log_event::LoggingEvent) values into Seq's
//! raw-event JSON format and POSTs them to `<server>/api/events/raw`.
//!
//! # Payload
//!
//! ```text
//! {"events":[{"Timestamp":"...","Level":"Information","EventType":67145,
//!   "MessageTemplate":"...","Properties":{...}}, ...]}
//! ```
//!
//! # Delivery Semantics
//!
//! - **No server configured**: nothing is sent and nothing is reported.
//! - **2xx**: success.
//! - **Any other status**: reported as `Received failed result <status>: <body>`.
//! - **Network errors and timeouts**: reported; the batch is dropped.
//!
//! Delivery is at-most-once: failed batches are never retried.

mod config;
mod escape;
mod handler;
mod record;
mod serialise;
mod transport;

#[cfg(test)]
mod tests;

pub use config::{
    API_KEY_HEADER, DEFAULT_TIMEOUT, RAW_EVENTS_RESOURCE, SeqHandlerConfig, normalise_server_url,
};
pub use escape::{escape_message_template, sanitize_key};
pub use handler::SeqHandler;
pub use record::{LOG4NET_EVENT_TYPE, LOGGER_PROPERTY};
pub use serialise::{encode_events, encode_payload};
pub use transport::{ResponseClass, classify_status};
