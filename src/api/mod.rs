//! HTTP API for the floor coordinator
//!
//! Front-of-house clients poll the full floor state and issue commands
//! over a small JSON API.
//!
//! ```text
//!  GET    /api/health                 liveness and uptime
//!  GET    /api/state                  full floor snapshot
//!  POST   /api/waitlist               add a party
//!  DELETE /api/waitlist/{id}          remove a party
//!  GET    /api/tables/{id}            one table
//!  POST   /api/tables/{id}/seat       seat a party
//!  POST   /api/tables/{id}/bus        seated -> dirty
//!  POST   /api/tables/{id}/clear      dirty -> free
//!  POST   /api/tables/{id}/hold       free -> waiting
//!  POST   /api/tables/{id}/release    waiting -> free
//!  PUT    /api/tables/{id}/server     assign or unassign a server
//!  PUT    /api/tables/{id}/notes      replace table notes
//!  GET    /api/suggestion             next server and loads
//!  PUT    /api/rotation               switch rotation mode
//!  POST   /api/servers                add a server
//!  DELETE /api/servers/{name}         remove a server
//!  PUT    /api/servers/{name}/duty    toggle on-duty
//!  GET    /metrics                    Prometheus text format
//! ```
//!
//! Rejected commands answer 400 (invalid input), 404 (unknown table,
//! party or server) or 409 (table status conflict).

pub mod config;
pub mod routes;
pub mod server;

// Re-export main types
pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
pub use routes::{create_router, ApiError, ApiResponse, ErrorResponse, HealthResponse};
pub use server::{ApiServer, AppState, ServerError, ServerInfo};
