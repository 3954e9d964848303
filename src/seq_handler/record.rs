//! Borrowing serialisable view of an event in Seq's raw-event shape.
//!
//! Key order is fixed: `Timestamp`, `Level`, `EventType`,
//! `MessageTemplate`, optional `Exception`, then `Properties`.

use std::collections::HashSet;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use super::escape::{escape_message_template, sanitize_key};
use crate::log_event::LoggingEvent;
use crate::parameter::Parameter;
use crate::value::{PropertyValue, RoundTrip};

/// Event type tag marking events as log4net-shaped for Seq.
pub const LOG4NET_EVENT_TYPE: u32 = 67145;

/// Sanitised name of the synthesized `log4net:Logger` property.
pub const LOGGER_PROPERTY: &str = "log4net_Logger";

/// One event as written to the payload.
pub(super) struct SeqSerializableEvent<'a> {
    event: &'a LoggingEvent,
    parameters: &'a [Parameter],
}

impl<'a> SeqSerializableEvent<'a> {
    pub(super) fn new(event: &'a LoggingEvent, parameters: &'a [Parameter]) -> Self {
        Self { event, parameters }
    }
}

impl Serialize for SeqSerializableEvent<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let event = self.event;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Timestamp", &RoundTrip(event.timestamp))?;
        map.serialize_entry("Level", event.seq_level())?;
        map.serialize_entry("EventType", &LOG4NET_EVENT_TYPE)?;
        map.serialize_entry("MessageTemplate", &escape_message_template(&event.message))?;
        if let Some(exception) = &event.exception {
            map.serialize_entry("Exception", exception)?;
        }
        map.serialize_entry(
            "Properties",
            &PropertiesPayload {
                event,
                parameters: self.parameters,
            },
        )?;
        map.end()
    }
}

/// The nested `Properties` object.
///
/// Parameters come first, then the logger name, then the event's own
/// properties under sanitised keys. The first value written for a key
/// wins; later ones are skipped.
struct PropertiesPayload<'a> {
    event: &'a LoggingEvent,
    parameters: &'a [Parameter],
}

impl Serialize for PropertiesPayload<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let event = self.event;
        let mut written: HashSet<String> = HashSet::new();
        let mut map = serializer.serialize_map(None)?;

        for parameter in self.parameters {
            if written.insert(parameter.name().to_owned()) {
                let value = parameter.render(event);
                map.serialize_entry(parameter.name(), &Literal(&value))?;
            }
        }

        if written.insert(LOGGER_PROPERTY.to_owned()) {
            let logger = PropertyValue::from(event.logger.as_str());
            map.serialize_entry(LOGGER_PROPERTY, &Literal(&logger))?;
        }

        for (key, value) in event.properties().iter() {
            let key = sanitize_key(key);
            if written.insert(key.clone()) {
                map.serialize_entry(&key, &Literal(value))?;
            }
        }

        map.end()
    }
}

/// A property value after string literalisation.
struct Literal<'a>(&'a PropertyValue);

impl Serialize for Literal<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.literalize().serialize(serializer)
    }
}
