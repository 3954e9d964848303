//! Error reporting channel for delivery failures.
//!
//! Handlers never return delivery failures to the code that triggered a
//! flush. Each failure is turned into one message and passed to an
//! [`ErrorHandler`] supplied by the host.

use std::sync::atomic::{AtomicBool, Ordering};

pub trait ErrorHandler: Send + Sync {
    fn error(&self, message: &str);
}

impl<F> ErrorHandler for F
where
    F: Fn(&str) + Send + Sync,
{
    fn error(&self, message: &str) {
        self(message)
    }
}

/// Reports every failure through the `log` facade at error level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrorHandler;

impl ErrorHandler for LogErrorHandler {
    fn error(&self, message: &str) {
        log::error!("SeqHandler: {message}");
    }
}

/// Reports the first failure at error level and demotes the rest to
/// debug, so a dead server does not flood the host's own logs.
#[derive(Debug, Default)]
pub struct OnlyOnceErrorHandler {
    reported: AtomicBool,
}

impl OnlyOnceErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_reported(&self) -> bool {
        self.reported.load(Ordering::Relaxed)
    }
}

impl ErrorHandler for OnlyOnceErrorHandler {
    fn error(&self, message: &str) {
        if self.reported.swap(true, Ordering::Relaxed) {
            log::debug!("SeqHandler: {message}");
        } else {
            log::error!("SeqHandler: {message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtest::Logger;
    use serial_test::serial;

    /// `logtest::Logger::start` installs a process-wide logger and panics if
    /// called twice, so install it once and drain records left by earlier tests.
    fn start_logger() -> Logger {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            Logger::start();
        });
        let mut logger = Logger;
        while logger.pop().is_some() {}
        logger
    }

    #[test]
    #[serial]
    fn log_handler_emits_error_record() {
        let mut logger = start_logger();
        LogErrorHandler.error("Received failed result 500: server error");
        let record = std::iter::from_fn(|| logger.pop())
            .find(|r| r.args().starts_with("SeqHandler:"))
            .expect("log record");
        assert_eq!(record.level(), log::Level::Error);
        assert_eq!(
            record.args(),
            "SeqHandler: Received failed result 500: server error"
        );
    }

    #[test]
    #[serial]
    fn only_once_demotes_repeats() {
        let mut logger = start_logger();
        let handler = OnlyOnceErrorHandler::new();
        assert!(!handler.has_reported());
        handler.error("first");
        handler.error("second");
        assert!(handler.has_reported());

        let levels: Vec<_> = std::iter::from_fn(|| logger.pop())
            .filter(|r| r.args().starts_with("SeqHandler:"))
            .map(|r| (r.level(), r.args().to_owned()))
            .collect();
        assert_eq!(
            levels,
            vec![
                (log::Level::Error, "SeqHandler: first".to_owned()),
                (log::Level::Debug, "SeqHandler: second".to_owned()),
            ]
        );
    }
}
