use std::io;

use thiserror::Error;

use crate::log_event::LoggingEvent;

/// Trait implemented by batch handlers.
///
/// The host framework owns buffering and calls [`send_buffer`] with
/// every batch it decides to flush. Implementations block until the
/// outcome is known and never surface a failure to the caller.
///
/// [`send_buffer`]: BatchHandler::send_buffer
pub trait BatchHandler: Send + Sync {
    /// Deliver a batch of events.
    fn send_buffer(&self, events: &mut [LoggingEvent]);

    /// Release transport resources. Later sends are dropped.
    fn close(&self) {}
}

/// Reasons a batch could not be delivered.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The server answered with a non-success status.
    #[error("Received failed result {status}: {body}")]
    FailedResult { status: u16, body: String },
    /// Connection, TLS, or timeout failure.
    #[error("Failed to send events: {0}")]
    Transport(String),
    #[error("Failed to encode events: {0}")]
    Encode(#[source] io::Error),
    #[error("handler is closed")]
    Closed,
}

/// Successful outcomes of a delivery attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing was sent: no server configured or an empty batch.
    Skipped,
    /// The server accepted the batch with the given 2xx status.
    Delivered { status: u16 },
}
