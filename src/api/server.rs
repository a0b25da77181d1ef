//! HTTP server wrapping the floor coordinator

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::floor::{FloorCoordinator, RotationMode};

use super::config::ServerConfig;
use super::routes::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Floor coordinator
    pub floor: Arc<FloorCoordinator>,

    /// Server start time
    pub start_time: Instant,

    /// HTTP configuration
    pub config: ServerConfig,
}

impl AppState {
    /// State around an existing coordinator
    pub fn new(floor: Arc<FloorCoordinator>, config: ServerConfig) -> Self {
        Self {
            floor,
            start_time: Instant::now(),
            config,
        }
    }
}

// ============================================================================
// API Server
// ============================================================================

/// HTTP front end for one dining room
pub struct ApiServer {
    config: Config,
    state: AppState,
}

impl ApiServer {
    /// Create a server, building the floor from configuration
    pub fn new(config: Config) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::Config(format!("{e:#}")))?;

        let floor = FloorCoordinator::from_config(&config.floor)
            .map_err(|e| ServerError::Init(e.to_string()))?;

        let state = AppState::new(Arc::new(floor), config.server.clone());

        Ok(Self { config, state })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes and layers
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.server.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.server.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Serve until the shutdown future resolves
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.server.bind_address;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        let local = listener
            .local_addr()
            .map_err(|e| ServerError::Bind(e.to_string()))?;
        tracing::info!(addr = %local, "Floor server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Floor server shutdown complete");
        Ok(())
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            bind_address: self.config.server.bind_address,
            rotation: self.config.floor.rotation,
            max_party_size: self.config.floor.max_party_size,
            cors_enabled: self.config.server.enable_cors,
            metrics_enabled: self.config.server.enable_metrics,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub bind_address: SocketAddr,
    pub rotation: RotationMode,
    pub max_party_size: u32,
    pub cors_enabled: bool,
    pub metrics_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        format!(
            "Tableside Server\n\
             {:-<40}\n\
             Bind Address: {}\n\
             Rotation: {}\n\
             Max Party Size: {}\n\
             CORS: {}\n\
             Metrics: {}",
            "",
            self.bind_address,
            self.rotation,
            self.max_party_size,
            if self.cors_enabled { "enabled" } else { "disabled" },
            if self.metrics_enabled { "enabled" } else { "disabled" }
        )
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Error, Debug, Clone)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization error: {0}")]
    Init(String),

    #[error("Failed to bind: {0}")]
    Bind(String),

    #[error("Server error: {0}")]
    Serve(String),
}

// ============================================================================
// Tests
// ============================================================================
