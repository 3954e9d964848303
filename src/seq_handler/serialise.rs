//! Serialisation of event batches into Seq raw-event payloads.
//!
//! [`encode_events`] produces the comma-joined event objects;
//! [`encode_payload`] wraps them in the `{"events":[...]}` envelope
//! posted to the server.

use std::io;

use serde::Serialize;

use super::escape::SeqFormatter;
use super::record::SeqSerializableEvent;
use crate::log_event::LoggingEvent;
use crate::parameter::Parameter;

const ENVELOPE_PREFIX: &[u8] = b"{\"events\":[";
const ENVELOPE_SUFFIX: &[u8] = b"]}";

/// Rough per-event size used to pre-size the output buffer.
const EVENT_SIZE_HINT: usize = 256;

/// Serialise `events` as JSON objects joined by `,`.
///
/// The output is a valid JSON array once wrapped in `[` and `]`. An
/// empty batch yields an empty string.
///
/// # Errors
///
/// Returns an error only if the JSON writer fails, which does not happen
/// for any event constructible through the public API.
pub fn encode_events(events: &[LoggingEvent], parameters: &[Parameter]) -> io::Result<String> {
    let mut buf = Vec::with_capacity(events.len() * EVENT_SIZE_HINT);
    write_events(&mut buf, events, parameters)?;
    String::from_utf8(buf).map_err(io::Error::other)
}

/// Serialise `events` into the complete request body.
///
/// # Errors
///
/// See [`encode_events`].
pub fn encode_payload(events: &[LoggingEvent], parameters: &[Parameter]) -> io::Result<String> {
    let mut buf = Vec::with_capacity(
        ENVELOPE_PREFIX.len() + events.len() * EVENT_SIZE_HINT + ENVELOPE_SUFFIX.len(),
    );
    buf.extend_from_slice(ENVELOPE_PREFIX);
    write_events(&mut buf, events, parameters)?;
    buf.extend_from_slice(ENVELOPE_SUFFIX);
    String::from_utf8(buf).map_err(io::Error::other)
}

fn write_events(
    buf: &mut Vec<u8>,
    events: &[LoggingEvent],
    parameters: &[Parameter],
) -> io::Result<()> {
    for (index, event) in events.iter().enumerate() {
        if index > 0 {
            buf.push(b',');
        }
        let mut serializer = serde_json::Serializer::with_formatter(&mut *buf, SeqFormatter);
        SeqSerializableEvent::new(event, parameters)
            .serialize(&mut serializer)
            .map_err(io::Error::other)?;
    }
    Ok(())
}
