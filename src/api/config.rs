//! HTTP server configuration

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;

fn default_bind_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

/// Configuration for the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Enable CORS for the API (the polling UI may be served elsewhere)
    pub enable_cors: bool,

    /// Enable request logging
    pub enable_request_logging: bool,

    /// Expose Prometheus metrics at /metrics
    pub enable_metrics: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            enable_cors: true,
            enable_request_logging: true,
            enable_metrics: true,
        }
    }
}

impl ServerConfig {
    /// Create a new config builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.port() == 0 && !self.bind_address.ip().is_loopback() {
            return Err(ConfigError::InvalidValue {
                field: "bind_address".to_string(),
                reason: "Ephemeral ports are only allowed on loopback".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    bind_address: Option<SocketAddr>,
    enable_cors: Option<bool>,
    enable_request_logging: Option<bool>,
    enable_metrics: Option<bool>,
}

impl ServerConfigBuilder {
    /// Set bind address from string
    pub fn bind_address_str(mut self, addr: &str) -> Result<Self, ConfigError> {
        self.bind_address = Some(addr.parse().map_err(|_| ConfigError::InvalidValue {
            field: "bind_address".to_string(),
            reason: format!("Invalid address: {}", addr),
        })?);
        Ok(self)
    }

    /// Enable/disable CORS
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.enable_cors = Some(enable);
        self
    }

    /// Enable/disable request logging
    pub fn enable_request_logging(mut self, enable: bool) -> Self {
        self.enable_request_logging = Some(enable);
        self
    }

    /// Enable/disable the metrics endpoint
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = Some(enable);
        self
    }

    /// Build the config
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let config = ServerConfig {
            bind_address: self.bind_address.unwrap_or_else(default_bind_address),
            enable_cors: self.enable_cors.unwrap_or(true),
            enable_request_logging: self.enable_request_logging.unwrap_or(true),
            enable_metrics: self.enable_metrics.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
