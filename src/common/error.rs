//! Error types for the application.

use thiserror::Error;

/// Configuration-related errors.
///
/// Every variant is fatal at startup: the process logs the message and
/// exits non-zero without attempting any network connection.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {name} is not defined")]
    MissingVar { name: &'static str },

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}
