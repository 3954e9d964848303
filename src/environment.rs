//! Source of the hosting environment name stamped on every event.
//!
//! The handler asks its [`EnvironmentSource`] once per send and writes
//! the answer into each event's `Environment` property.

use std::env;
use std::fmt;

/// Property written on every event before it is encoded.
pub const ENVIRONMENT_PROPERTY: &str = "Environment";

pub trait EnvironmentSource: Send + Sync {
    fn environment_name(&self) -> String;
}

impl<F> EnvironmentSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn environment_name(&self) -> String {
        self()
    }
}

/// Fixed environment name supplied at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticEnvironment(String);

impl StaticEnvironment {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl EnvironmentSource for StaticEnvironment {
    fn environment_name(&self) -> String {
        self.0.clone()
    }
}

/// Environment name read from a process variable at send time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvVarEnvironment {
    variable: String,
    fallback: String,
}

impl EnvVarEnvironment {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            fallback: String::new(),
        }
    }

    /// Name used when the variable is unset or not valid UTF-8.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }
}

impl EnvironmentSource for EnvVarEnvironment {
    fn environment_name(&self) -> String {
        env::var(&self.variable).unwrap_or_else(|_| self.fallback.clone())
    }
}

impl fmt::Display for EnvVarEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.variable)
    }
}
