//! Log event representation consumed by the Seq encoder.
//!
//! This module defines the `LoggingEvent` struct that a host logging
//! framework fills in before handing a batch to a handler, along with
//! the ordered property map and source metadata carried by each event.

use std::error::Error;
use std::fmt::{self, Write as _};
use std::thread;

use chrono::{DateTime, FixedOffset, Utc};

use crate::level::EventLevel;
use crate::value::PropertyValue;

/// Additional context associated with an event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventMetadata {
    /// Rust module path where the log call originated.
    pub module_path: Option<String>,
    /// Source file name for the log call.
    pub filename: Option<String>,
    /// Line number in the source file.
    pub line_number: Option<u32>,
    /// Name of the thread that created the event (if any).
    pub thread_name: Option<String>,
}

impl EventMetadata {
    /// Capture thread info from the current execution context.
    pub fn capture() -> Self {
        Self {
            thread_name: thread::current().name().map(ToString::to_string),
            ..Self::default()
        }
    }
}

/// Ordered property map with unique keys.
///
/// Insertion order is preserved; setting an existing key replaces its
/// value in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (k, v) in iter {
            properties.insert(k, v);
        }
        properties
    }
}

#[derive(Clone, Debug)]
pub struct LoggingEvent {
    /// Name of the logger that created this event.
    pub logger: String,
    /// The level name as supplied by the host (e.g. "INFO" or "ERROR").
    level: String,
    /// Level the name maps to; `None` encodes as `Information`.
    parsed_level: Option<EventLevel>,
    /// The rendered message.
    pub message: String,
    /// Display form of the associated error, if any.
    pub exception: Option<String>,
    /// Time the event occurred.
    pub timestamp: DateTime<FixedOffset>,
    /// Contextual metadata for the event.
    pub metadata: EventMetadata,
    properties: Properties,
}

impl LoggingEvent {
    /// Construct a new event from logger `name`, `level`, and `message`,
    /// stamped with the current UTC time.
    pub fn new(logger: &str, level: &str, message: &str) -> Self {
        Self {
            logger: logger.to_owned(),
            level: level.to_owned(),
            parsed_level: level.parse().ok(),
            message: message.to_owned(),
            exception: None,
            timestamp: Utc::now().into(),
            metadata: EventMetadata::capture(),
            properties: Properties::new(),
        }
    }

    /// Construct an event with explicit source metadata.
    pub fn with_metadata(logger: &str, level: &str, message: &str, metadata: EventMetadata) -> Self {
        Self {
            metadata,
            ..Self::new(logger, level, message)
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach the display form of an exception object.
    pub fn with_exception(mut self, exception: impl fmt::Display) -> Self {
        self.exception = Some(exception.to_string());
        self
    }

    /// Attach an error together with its chain of sources.
    pub fn with_error(mut self, error: &(dyn Error + 'static)) -> Self {
        let mut text = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            let _ = write!(text, "\nCaused by: {cause}");
            source = cause.source();
        }
        self.exception = Some(text);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key, value);
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Level name as supplied by the host.
    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn parsed_level(&self) -> Option<EventLevel> {
        self.parsed_level
    }

    /// Replace the level name and re-derive the level it maps to.
    pub fn set_level(&mut self, level: &str) {
        self.level = level.to_owned();
        self.parsed_level = level.parse().ok();
    }

    /// Replace the level name with one whose mapping the host already
    /// knows, e.g. a framework-specific name such as `TRACE`.
    pub fn set_mapped_level(&mut self, level: &str, mapped: EventLevel) {
        self.level = level.to_owned();
        self.parsed_level = Some(mapped);
    }

    /// Name of the Seq level this event maps to.
    pub fn seq_level(&self) -> &'static str {
        crate::level::seq_level_name(self.parsed_level)
    }
}

impl fmt::Display for LoggingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.message)
    }
}
