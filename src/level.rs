//! Source levels understood by the Seq encoder.
//!
//! Host frameworks hand over level *names*; only the five below have a
//! Seq counterpart. Anything else is kept as text on the event and
//! encoded as `Information`.

use std::fmt;
use std::str::FromStr;

/// Seq level used when the source level is missing or unrecognised.
pub const DEFAULT_SEQ_LEVEL: &str = "Information";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Default for EventLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FATAL" => Ok(Self::Fatal),
            _ => Err(()),
        }
    }
}

impl EventLevel {
    /// Source-side name, e.g. `"WARN"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Name of the matching level in Seq's schema.
    pub fn seq_name(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Info => "Information",
            Self::Warn => "Warning",
            Self::Error => "Error",
            Self::Fatal => "Fatal",
        }
    }
}

/// Map an optional parsed level to its Seq name, defaulting to
/// [`DEFAULT_SEQ_LEVEL`].
pub fn seq_level_name(level: Option<EventLevel>) -> &'static str {
    level.map_or(DEFAULT_SEQ_LEVEL, |l| l.seq_name())
}
