//! tableside - live floor coordination for a restaurant
//!
//! Tracks every table's status, the waitlist of parties, and the servers on
//! the floor, and suggests who should take the next party. All mutations go
//! through one coordinator so concurrent hosts never double-seat a table.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`floor`] - Tables, waitlist, roster, and the coordinator that owns them
//! - [`api`] - HTTP API and server wrapper
//! - [`config`] - Configuration management and settings
//! - [`metrics`] - Prometheus metrics
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use tableside::api::ApiServer;
//! use tableside::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = ApiServer::new(config)?;
//!     server.start_with_shutdown(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod floor;
pub mod metrics;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::api::{ApiServer, AppState};
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result, TablesideErrorTrait};
    pub use crate::floor::{
        FloorCoordinator, FloorError, FloorSnapshot, RotationMode, SeatRequest, TableStatus,
    };
}

// Direct re-exports for convenience
pub use error::{Error, Result};
pub use floor::{FloorCoordinator, FloorSnapshot, SeatRequest, TableStatus};
