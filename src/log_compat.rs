//! Compatibility bridge for the Rust `log` crate.
//!
//! Hosts that collect records through the `log` facade can convert each
//! [`log::Record`] into a [`LoggingEvent`] and hand batches of them to a
//! [`BatchHandler`](crate::handler::BatchHandler).

use std::borrow::Cow;

use crate::level::EventLevel;
use crate::log_event::{EventMetadata, LoggingEvent};

/// Map a `log` level onto the event level set.
///
/// `Trace` has no counterpart and folds into `Debug`.
pub fn map_log_level(level: log::Level) -> EventLevel {
    match level {
        log::Level::Trace | log::Level::Debug => EventLevel::Debug,
        log::Level::Info => EventLevel::Info,
        log::Level::Warn => EventLevel::Warn,
        log::Level::Error => EventLevel::Error,
    }
}

impl From<log::Level> for EventLevel {
    fn from(level: log::Level) -> Self {
        map_log_level(level)
    }
}

fn normalise_target(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

impl From<&log::Record<'_>> for LoggingEvent {
    fn from(record: &log::Record<'_>) -> Self {
        let metadata = EventMetadata {
            module_path: record.module_path().map(str::to_owned),
            filename: record.file().map(str::to_owned),
            line_number: record.line(),
            ..EventMetadata::capture()
        };
        let level = record.level().as_str();
        let mut event = LoggingEvent::with_metadata(
            &normalise_target(record.target()),
            level,
            &record.args().to_string(),
            metadata,
        );
        // Trace records keep the name TRACE but encode as Debug.
        event.set_mapped_level(level, map_log_level(record.level()));
        event
    }
}
