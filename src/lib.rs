//! Batched log shipping to a Seq server.
//!
//! The crate encodes batches of [`LoggingEvent`] values into Seq's raw
//! event JSON and POSTs them to `<server>/api/events/raw`. Delivery is
//! synchronous and at-most-once: failures are reported through an
//! [`ErrorHandler`] and the batch is dropped.
//!
//! ```no_run
//! use seq_appender::{BatchHandler, LoggingEvent, Parameter, SeqHandlerBuilder};
//!
//! # fn main() -> Result<(), seq_appender::HandlerBuildError> {
//! let handler = SeqHandlerBuilder::new()
//!     .with_server_url("http://localhost:5341")
//!     .with_api_key("A1B2C3")
//!     .with_parameter(Parameter::constant("Application", "billing"))
//!     .build()?;
//!
//! let mut batch = vec![LoggingEvent::new("billing.invoices", "INFO", "Invoice {Id} issued")
//!     .with_property("Id", 42)];
//! handler.send_buffer(&mut batch);
//! handler.close();
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod error_handler;
pub mod handler;
pub mod handlers;
pub mod level;
#[cfg(feature = "log-compat")]
pub mod log_compat;
pub mod log_event;
pub mod parameter;
pub mod rate_limited_warner;
pub mod seq_handler;
pub mod value;

pub use environment::{ENVIRONMENT_PROPERTY, EnvVarEnvironment, EnvironmentSource, StaticEnvironment};
pub use error_handler::{ErrorHandler, LogErrorHandler, OnlyOnceErrorHandler};
pub use handler::{BatchHandler, Delivery, DeliveryError};
pub use handlers::{HandlerBuildError, HandlerBuilderTrait, SeqHandlerBuilder, parse_timespan};
pub use level::EventLevel;
#[cfg(feature = "log-compat")]
pub use log_compat::map_log_level;
pub use log_event::{EventMetadata, LoggingEvent, Properties};
pub use parameter::{EventField, Parameter, ParameterRenderer};
pub use rate_limited_warner::RateLimitedWarner;
pub use seq_handler::{
    SeqHandler, SeqHandlerConfig, encode_events, encode_payload, escape_message_template,
    sanitize_key,
};
pub use value::{Decimal, PropertyValue, RoundTrip};
