//! Named per-event value renderers configured on a handler.
//!
//! A [`Parameter`] is evaluated against every event at serialisation
//! time and written into the event's `Properties` object ahead of the
//! event's own properties.

use std::fmt;
use std::sync::Arc;

use crate::log_event::LoggingEvent;
use crate::value::PropertyValue;

/// Renders a value from an event.
pub trait ParameterRenderer: Send + Sync {
    fn render(&self, event: &LoggingEvent) -> PropertyValue;
}

impl<F> ParameterRenderer for F
where
    F: Fn(&LoggingEvent) -> PropertyValue + Send + Sync,
{
    fn render(&self, event: &LoggingEvent) -> PropertyValue {
        self(event)
    }
}

/// Event fields available to [`Parameter::field`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventField {
    Logger,
    Level,
    Message,
    Thread,
    Module,
    File,
    Line,
}

impl ParameterRenderer for EventField {
    fn render(&self, event: &LoggingEvent) -> PropertyValue {
        let meta = &event.metadata;
        match self {
            Self::Logger => event.logger.as_str().into(),
            Self::Level => event.level().into(),
            Self::Message => event.message.as_str().into(),
            Self::Thread => meta.thread_name.as_deref().into(),
            Self::Module => meta.module_path.as_deref().into(),
            Self::File => meta.filename.as_deref().into(),
            Self::Line => meta.line_number.into(),
        }
    }
}

struct Constant(PropertyValue);

impl ParameterRenderer for Constant {
    fn render(&self, _event: &LoggingEvent) -> PropertyValue {
        self.0.clone()
    }
}

struct EventProperty(String);

impl ParameterRenderer for EventProperty {
    fn render(&self, event: &LoggingEvent) -> PropertyValue {
        event
            .property(&self.0)
            .cloned()
            .unwrap_or(PropertyValue::Null)
    }
}

#[derive(Clone)]
pub struct Parameter {
    name: String,
    renderer: Arc<dyn ParameterRenderer>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, renderer: impl ParameterRenderer + 'static) -> Self {
        Self {
            name: name.into(),
            renderer: Arc::new(renderer),
        }
    }

    /// Same value for every event, e.g. an application name.
    pub fn constant(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self::new(name, Constant(value.into()))
    }

    /// Copy of the event property `key`, or `null` when absent.
    pub fn property(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(name, EventProperty(key.into()))
    }

    pub fn field(name: impl Into<String>, field: EventField) -> Self {
        Self::new(name, field)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, event: &LoggingEvent) -> PropertyValue {
        self.renderer.render(event)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
