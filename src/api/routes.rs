//! REST API handlers
//!
//! Thin mapping from HTTP routes onto floor coordinator commands. All
//! validation and state rules live in the coordinator; handlers only
//! translate bodies and errors.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::floor::{
    ErrorKind, FloorError, FloorSnapshot, RotationMode, SeatRequest, Server, Suggestion, Table,
    WaitQuote, WaitlistEntry,
};
use crate::metrics;

use super::server::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Floor error as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub FloorError);

impl From<FloorError> for ApiError {
    fn from(err: FloorError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        tracing::warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

// ============================================================================
// Request Bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddWaitBody {
    pub name: String,
    #[serde(alias = "party_size")]
    pub party: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub quote: Option<WaitQuote>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeatBody {
    #[serde(default)]
    pub wait_id: Option<Uuid>,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub party_size: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub confirm_dirty: bool,
}

impl SeatBody {
    fn into_request(self, table_id: u32) -> SeatRequest {
        SeatRequest {
            table_id,
            wait_id: self.wait_id,
            server: self.server,
            party: self.party,
            party_size: self.party_size,
            notes: self.notes,
            confirm_dirty: self.confirm_dirty,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignServerBody {
    #[serde(default)]
    pub server: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotesBody {
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct RotationBody {
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct AddServerBody {
    pub name: String,
    #[serde(default)]
    pub section: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DutyBody {
    pub on_duty: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RotationResponse {
    pub mode: RotationMode,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/state", get(get_state))
        // Waitlist
        .route("/api/waitlist", post(add_wait))
        .route("/api/waitlist/{id}", delete(remove_wait))
        // Tables
        .route("/api/tables/{id}", get(get_table))
        .route("/api/tables/{id}/seat", post(seat_table))
        .route("/api/tables/{id}/bus", post(bus_table))
        .route("/api/tables/{id}/clear", post(clear_table))
        .route("/api/tables/{id}/hold", post(hold_table))
        .route("/api/tables/{id}/release", post(release_table))
        .route("/api/tables/{id}/server", put(assign_server))
        .route("/api/tables/{id}/notes", put(set_notes))
        // Servers
        .route("/api/suggestion", get(suggest_server))
        .route("/api/rotation", put(set_rotation))
        .route("/api/servers", get(list_servers).post(add_server))
        .route("/api/servers/{name}", delete(remove_server))
        .route("/api/servers/{name}/duty", put(set_duty))
        .route("/api/servers/{name}/unmark", post(unmark_seating));

    if state.config.enable_metrics {
        router = router
            .route("/metrics", get(metrics_handler))
            .route_layer(middleware::from_fn(track_requests));
    }

    router.with_state(state)
}

/// Count and time each request against its route template
async fn track_requests(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let start = Instant::now();
    let response = next.run(req).await;

    metrics::record_api_request(
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

// ============================================================================
// Read Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

async fn get_state(State(state): State<AppState>) -> Json<ApiResponse<FloorSnapshot>> {
    Json(ApiResponse::success(state.floor.snapshot().await))
}

async fn get_table(State(state): State<AppState>, Path(id): Path<u32>) -> ApiResult<Table> {
    ok(state.floor.table(id).await?)
}

async fn suggest_server(State(state): State<AppState>) -> Json<ApiResponse<Suggestion>> {
    Json(ApiResponse::success(state.floor.suggest_server().await))
}

async fn metrics_handler() -> Response {
    match metrics::encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Failed to encode metrics: {e}"))),
        )
            .into_response(),
    }
}

// ============================================================================
// Waitlist Handlers
// ============================================================================

async fn add_wait(
    State(state): State<AppState>,
    Json(body): Json<AddWaitBody>,
) -> Result<(StatusCode, Json<ApiResponse<WaitlistEntry>>), ApiError> {
    let entry = state
        .floor
        .add_wait(&body.name, body.party, &body.notes, body.quote)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(entry))))
}

async fn remove_wait(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<RemovedResponse> {
    let removed = state.floor.remove_wait(id).await;
    ok(RemovedResponse { removed })
}

// ============================================================================
// Table Handlers
// ============================================================================

async fn seat_table(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<SeatBody>,
) -> ApiResult<Table> {
    ok(state.floor.seat(body.into_request(id)).await?)
}

async fn bus_table(State(state): State<AppState>, Path(id): Path<u32>) -> ApiResult<Table> {
    ok(state.floor.bus(id).await?)
}

async fn clear_table(State(state): State<AppState>, Path(id): Path<u32>) -> ApiResult<Table> {
    ok(state.floor.clear(id).await?)
}

async fn hold_table(State(state): State<AppState>, Path(id): Path<u32>) -> ApiResult<Table> {
    ok(state.floor.hold(id).await?)
}

async fn release_table(State(state): State<AppState>, Path(id): Path<u32>) -> ApiResult<Table> {
    ok(state.floor.release(id).await?)
}

async fn assign_server(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<AssignServerBody>,
) -> ApiResult<Table> {
    ok(state.floor.assign_server(id, body.server).await?)
}

async fn set_notes(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<NotesBody>,
) -> ApiResult<Table> {
    ok(state.floor.set_notes(id, body.notes).await?)
}

// ============================================================================
// Roster Handlers
// ============================================================================

async fn set_rotation(State(state): State<AppState>, Json(body): Json<RotationBody>) -> ApiResult<RotationResponse> {
    let mode = state.floor.set_rotation(&body.mode).await?;
    ok(RotationResponse { mode })
}

async fn list_servers(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    ok(state.floor.list_servers().await)
}

async fn add_server(
    State(state): State<AppState>,
    Json(body): Json<AddServerBody>,
) -> Result<(StatusCode, Json<ApiResponse<Server>>), ApiError> {
    let server = state.floor.add_server(&body.name, body.section).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(server))))
}

async fn remove_server(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<RemovedResponse> {
    let removed = state.floor.remove_server(&name).await;
    ok(RemovedResponse { removed })
}

async fn set_duty(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<DutyBody>,
) -> ApiResult<Server> {
    ok(state.floor.set_on_duty(&name, body.on_duty).await?)
}

async fn unmark_seating(State(state): State<AppState>, Path(name): Path<String>) -> ApiResult<Server> {
    ok(state.floor.unmark_seating(&name).await?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert!(response.data.is_some());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_error_response() {
        let response = ErrorResponse::new("test error");
        assert!(!response.success);
        assert_eq!(response.error, "test error");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
    }

    #[test]
    fn test_seat_body_into_request() {
        let body: SeatBody = serde_json::from_str(r#"{"server": "Alice", "confirm_dirty": true}"#).unwrap();
        let request = body.into_request(7);

        assert_eq!(request.table_id, 7);
        assert_eq!(request.server.as_deref(), Some("Alice"));
        assert!(request.confirm_dirty);
        assert!(request.wait_id.is_none());
    }

    #[test]
    fn test_add_wait_body_accepts_party_size() {
        let body: AddWaitBody = serde_json::from_str(r#"{"name": "Lee", "party_size": 2}"#).unwrap();
        assert_eq!(body.party, 2);
        assert!(body.notes.is_empty());
    }
}
