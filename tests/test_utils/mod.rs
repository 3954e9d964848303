//! Shared fixtures for the integration tests.
//!
//! Events built here carry a fixed timestamp so encoded output is
//! deterministic. Decoded `Properties` maps do not keep wire order, so
//! ordering checks go through [`assert_in_order`] on the raw text.

#![allow(dead_code)]

use chrono::DateTime;
use rstest::fixture;
use serde::Deserialize;
use serde_json::{Map, Value};

use seq_appender::{LoggingEvent, Parameter, encode_events};

pub const FIXED_TIMESTAMP: &str = "2024-01-02T03:04:05.1234567+02:00";

/// One decoded event object.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncodedEvent {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "EventType")]
    pub event_type: u32,
    #[serde(rename = "MessageTemplate")]
    pub message_template: String,
    #[serde(rename = "Exception")]
    pub exception: Option<String>,
    #[serde(rename = "Properties")]
    pub properties: Map<String, Value>,
}

/// Assert that each needle occurs in `haystack`, in the given order.
pub fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        let found = haystack[from..]
            .find(needle)
            .unwrap_or_else(|| panic!("{needle:?} missing or out of order in {haystack}"));
        from += found + needle.len();
    }
}

/// The `{"events":[...]}` request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncodedPayload {
    pub events: Vec<EncodedEvent>,
}

/// Build an event with a fixed timestamp.
pub fn event_at_fixed_time(logger: &str, level: &str, message: &str) -> LoggingEvent {
    let timestamp = DateTime::parse_from_rfc3339(FIXED_TIMESTAMP).expect("valid timestamp");
    LoggingEvent::new(logger, level, message).with_timestamp(timestamp)
}

#[fixture]
pub fn sample_event() -> LoggingEvent {
    event_at_fixed_time("app.orders", "INFO", "Order placed")
}

/// Encode events and decode the comma-joined objects as a JSON array.
pub fn encode_and_decode(events: &[LoggingEvent], parameters: &[Parameter]) -> Vec<EncodedEvent> {
    let encoded = encode_events(events, parameters).expect("encode events");
    serde_json::from_str(&format!("[{encoded}]")).expect("decode events")
}

pub fn encode_one(event: LoggingEvent) -> EncodedEvent {
    encode_and_decode(&[event], &[])
        .pop()
        .expect("one encoded event")
}
