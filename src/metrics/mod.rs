//! Prometheus metrics for the floor coordinator
//!
//! This module provides metrics tracking for:
//! - Floor commands: count by operation and outcome
//! - Floor state: waitlist length and occupied tables
//! - HTTP API: requests by route and status, request duration
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! Until then (or if initialization fails) every recording call is a no-op.

use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Encoder, Gauge,
    HistogramVec, TextEncoder,
};
use std::sync::{Mutex, OnceLock, PoisonError};

// ============================================================================
// Metrics Storage
// ============================================================================

struct FloorMetrics {
    commands: CounterVec,
    waitlist_length: Gauge,
    occupied_tables: Gauge,
    api_requests: CounterVec,
    api_duration: HistogramVec,
}

static FLOOR_METRICS: OnceLock<FloorMetrics> = OnceLock::new();

static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// Held for the whole of registration
static INIT_LOCK: Mutex<()> = Mutex::new(());

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// Safe to call more than once; later calls return `Ok(())` without
/// registering anything.
///
/// # Example
///
/// ```
/// if let Err(e) = tableside::metrics::init_metrics() {
///     eprintln!("Warning: Metrics initialization failed: {}", e);
/// }
/// assert!(tableside::metrics::encode_metrics().is_ok());
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = FloorMetrics {
        commands: register_counter_vec!(
            "tableside_floor_commands_total",
            "Floor commands by operation and outcome",
            &["operation", "outcome"]
        )?,
        waitlist_length: register_gauge!(
            "tableside_waitlist_length",
            "Parties currently on the waitlist"
        )?,
        occupied_tables: register_gauge!(
            "tableside_occupied_tables",
            "Tables currently seated"
        )?,
        api_requests: register_counter_vec!(
            "tableside_api_requests_total",
            "Total API requests by route and status",
            &["route", "status"]
        )?,
        api_duration: register_histogram_vec!(
            "tableside_api_request_duration_seconds",
            "API request duration in seconds",
            &["route"],
            vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
        )?,
    };

    FLOOR_METRICS
        .set(metrics)
        .map_err(|_| "Floor metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    FLOOR_METRICS.get().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record one floor command and how it ended
pub fn record_command(operation: &str, outcome: &str) {
    if let Some(m) = FLOOR_METRICS.get() {
        m.commands.with_label_values(&[operation, outcome]).inc();
    }
}

/// Update floor state gauges
pub fn update_floor_gauges(waitlist_len: usize, occupied: usize) {
    if let Some(m) = FLOOR_METRICS.get() {
        m.waitlist_length.set(waitlist_len as f64);
        m.occupied_tables.set(occupied as f64);
    }
}

/// Record API request
pub fn record_api_request(route: &str, status: u16, duration_secs: f64) {
    let Some(m) = FLOOR_METRICS.get() else {
        return;
    };

    let status_str = status.to_string();
    m.api_requests
        .with_label_values(&[route, status_str.as_str()])
        .inc();
    m.api_duration
        .with_label_values(&[route])
        .observe(duration_secs);
}

// ============================================================================
// Tests
// ============================================================================
