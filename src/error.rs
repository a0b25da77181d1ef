//! Unified error handling for the tableside crate
//!
//! Domain code returns [`FloorError`] so callers can match on the exact
//! rejection. Everything above the floor (startup, config loading, the
//! CLI) works in terms of the unified [`Error`].
//!
//! - [`TablesideErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use std::io;
use thiserror::Error;

pub use crate::api::{ConfigError, ServerError};
pub use crate::floor::{ErrorKind, FloorError};

/// Common trait for tableside error types
pub trait TablesideErrorTrait: std::error::Error {
    /// Whether retrying the same request could succeed
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;

    /// Whether the caller sent something the floor refused
    fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Client
    }
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Rejected floor command (bad input, unknown id, status conflict)
    Client,
    /// Configuration and validation errors
    Config,
    /// Network listener errors
    Network,
    /// I/O errors
    Storage,
    /// Serialization errors
    Serialization,
}

impl ErrorCategory {
    /// Short human description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Client => "request rejected",
            Self::Config => "configuration error",
            Self::Network => "network error",
            Self::Storage => "storage error",
            Self::Serialization => "serialization error",
        }
    }
}

impl TablesideErrorTrait for FloorError {
    fn is_recoverable(&self) -> bool {
        // A conflict can clear once the table moves on; the rest never will.
        self.kind() == ErrorKind::Conflict
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Client
    }
}

/// Unified error type for the tableside crate
#[derive(Error, Debug)]
pub enum Error {
    /// Floor command rejected
    #[error("Floor error: {0}")]
    Floor(#[from] FloorError),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Invalid server configuration value
    #[error("Config error: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl TablesideErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Floor(e) => e.is_recoverable(),
            Self::Server(ServerError::Bind(_)) => true,
            Self::Io(_) => true,
            _ => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Floor(e) => e.category(),
            Self::Server(ServerError::Config(_)) | Self::InvalidConfig(_) | Self::Config(_) => {
                ErrorCategory::Config
            }
            Self::Server(ServerError::Bind(_) | ServerError::Serve(_)) => ErrorCategory::Network,
            Self::Server(ServerError::Init(_)) => ErrorCategory::Config,
            Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) | Self::Toml(_) => ErrorCategory::Serialization,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

// Config loading reports through anyhow
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(format!("{err:#}"))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_errors_are_client_errors() {
        let err: Error = FloorError::TableNotFound(99).into();
        assert_eq!(err.category(), ErrorCategory::Client);
        assert!(err.is_client_error());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_conflict_is_recoverable() {
        let err = Error::Floor(FloorError::Conflict {
            table_id: 1,
            status: crate::floor::TableStatus::Free,
            operation: "bus",
        });
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_server_error_categories() {
        let bind = Error::Server(ServerError::Bind("in use".into()));
        assert_eq!(bind.category(), ErrorCategory::Network);
        assert!(bind.is_recoverable());

        let config = Error::Server(ServerError::Config("bad".into()));
        assert_eq!(config.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("sections must be between 1 and 9");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(!err.is_recoverable());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: Error = anyhow::anyhow!("missing file").context("loading config").into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("missing file"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: Error = parse.into();
        assert_eq!(err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_category_descriptions() {
        assert_eq!(ErrorCategory::Client.description(), "request rejected");
        assert_eq!(ErrorCategory::Serialization.description(), "serialization error");
    }
}
