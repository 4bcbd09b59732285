use chrono::Weekday;
use miette::Diagnostic;
use thiserror::Error;

use crate::schedule::ClockTime;

/// Main error type for the crate
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(pickup_hours::config))]
    Config(String),

    #[error("Invalid time of day: {0:?} (expected HH:MM)")]
    #[diagnostic(code(pickup_hours::time), help("use a 24-hour time such as 09:00"))]
    InvalidTime(String),

    #[error("{day}: closing time {close} is not after opening time {open}")]
    #[diagnostic(code(pickup_hours::hours))]
    InvalidHours {
        day: Weekday,
        open: ClockTime,
        close: ClockTime,
    },

    #[error("Usage error: {0}")]
    #[diagnostic(code(pickup_hours::usage))]
    Usage(String),

    #[error(transparent)]
    #[diagnostic(code(pickup_hours::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(pickup_hours::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(pickup_hours::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type HoursResult<T> = Result<T, Error>;

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create usage errors
pub fn usage_error(message: &str) -> Error {
    Error::Usage(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
