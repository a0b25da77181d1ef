//! HTTP API tests
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tableside::api::ApiServer;
use tableside::config::{Config, ServerEntry};

fn test_router() -> Router {
    let mut config = Config::default();
    config.floor.servers = vec![ServerEntry::new("Alice"), ServerEntry::new("Bob")];
    ApiServer::new(config).unwrap().build_router()
}

async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

// ============================================================================
// Read Endpoints
// ============================================================================

#[tokio::test]
async fn test_health() {
    let router = test_router();
    let (status, body) = call(&router, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn test_state_shape() {
    let router = test_router();
    let (status, body) = call(&router, Method::GET, "/api/state", None).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["tables"].as_array().unwrap().len(), 41);
    assert_eq!(data["counts"]["free"], 41);
    assert_eq!(data["rotation"], "least_loaded");
    assert_eq!(data["suggestion"], "Alice");
    assert_eq!(data["loads"]["Bob"], 0);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let router = test_router();
    let response = router
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Command Flow
// ============================================================================

#[tokio::test]
async fn test_waitlist_seat_bus_clear() {
    let router = test_router();

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/waitlist",
        Some(json!({"name": "Okafor", "party": 5, "notes": "high chair"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let wait_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/tables/31/seat",
        Some(json!({"wait_id": wait_id, "server": "Alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "seated");
    assert_eq!(body["data"]["server"], "Alice");
    assert_eq!(body["data"]["party"], "Okafor");

    let (_, body) = call(&router, Method::GET, "/api/suggestion", None).await;
    assert_eq!(body["data"]["suggestion"], "Bob");
    assert_eq!(body["data"]["loads"]["Alice"], 1);

    let (status, body) = call(&router, Method::POST, "/api/tables/31/bus", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "dirty");

    let (status, body) = call(&router, Method::POST, "/api/tables/31/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "free");
    assert!(body["data"]["server"].is_null());

    let (_, body) = call(&router, Method::GET, "/api/state", None).await;
    assert!(body["data"]["waitlist"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_hold_and_release() {
    let router = test_router();

    let (status, body) = call(&router, Method::POST, "/api/tables/2/hold", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "waiting");

    let (status, _) = call(&router, Method::POST, "/api/tables/2/hold", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&router, Method::POST, "/api/tables/2/release", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "free");
}

#[tokio::test]
async fn test_table_details() {
    let router = test_router();

    let (status, body) = call(
        &router,
        Method::PUT,
        "/api/tables/7/server",
        Some(json!({"server": "Bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["server"], "Bob");
    assert_eq!(body["data"]["status"], "free");

    let (status, body) = call(
        &router,
        Method::PUT,
        "/api/tables/7/notes",
        Some(json!({"notes": "window"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], "window");

    let (status, body) = call(&router, Method::GET, "/api/tables/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notes"], "window");
}

#[tokio::test]
async fn test_roster_management() {
    let router = test_router();

    let (status, _) = call(&router, Method::PUT, "/api/rotation", Some(json!({"mode": "round_robin"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&router, Method::POST, "/api/servers", Some(json!({"name": "Cara", "section": 3}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(&router, Method::POST, "/api/servers", Some(json!({"name": "Cara"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&router, Method::PUT, "/api/servers/Alice/duty", Some(json!({"on_duty": false}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["on_duty"], false);

    let (_, body) = call(&router, Method::GET, "/api/servers", None).await;
    assert_eq!(body["data"], json!(["Bob", "Cara"]));

    let (_, body) = call(&router, Method::GET, "/api/suggestion", None).await;
    assert_eq!(body["data"]["mode"], "round_robin");
    assert_eq!(body["data"]["suggestion"], "Bob");

    let (status, body) = call(&router, Method::DELETE, "/api/servers/Bob", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], true);

    let (_, body) = call(&router, Method::GET, "/api/suggestion", None).await;
    assert_eq!(body["data"]["suggestion"], "Cara");
}

#[tokio::test]
async fn test_sections_and_roster_limit() {
    let router = test_router();

    let (_, body) = call(&router, Method::POST, "/api/servers", Some(json!({"name": "Cara"}))).await;
    assert_eq!(body["data"]["section"], 3);

    for name in ["Dev", "Eli", "Fin", "Gus", "Hal", "Ida"] {
        let (status, _) = call(&router, Method::POST, "/api/servers", Some(json!({"name": name}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call(&router, Method::POST, "/api/servers", Some(json!({"name": "Jo"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Maximum number of servers (9)"));

    let (status, _) = call(&router, Method::POST, "/api/servers", Some(json!({"name": "Jo", "section": 12}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unmark_seating() {
    let router = test_router();
    call(&router, Method::PUT, "/api/rotation", Some(json!({"mode": "round_robin"}))).await;

    call(&router, Method::POST, "/api/tables/1/seat", Some(json!({"server": "Alice"}))).await;
    let (_, body) = call(&router, Method::GET, "/api/suggestion", None).await;
    assert_eq!(body["data"]["suggestion"], "Bob");

    call(&router, Method::POST, "/api/tables/1/bus", None).await;
    call(&router, Method::POST, "/api/tables/1/clear", None).await;

    let (status, body) = call(&router, Method::POST, "/api/servers/Alice/unmark", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["seatings"], 0);

    // Alice is back at the front on name order
    let (_, body) = call(&router, Method::GET, "/api/suggestion", None).await;
    assert_eq!(body["data"]["suggestion"], "Alice");

    let (status, _) = call(&router, Method::POST, "/api/servers/Nobody/unmark", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reassignment_moves_rotation() {
    let router = test_router();
    call(&router, Method::PUT, "/api/rotation", Some(json!({"mode": "round_robin"}))).await;

    call(&router, Method::POST, "/api/tables/1/seat", Some(json!({}))).await;
    call(&router, Method::PUT, "/api/tables/1/server", Some(json!({"server": "Alice"}))).await;
    call(&router, Method::POST, "/api/tables/1/bus", None).await;
    call(&router, Method::POST, "/api/tables/1/clear", None).await;

    let (_, body) = call(&router, Method::GET, "/api/suggestion", None).await;
    assert_eq!(body["data"]["suggestion"], "Bob");
}

// ============================================================================
// Error Mapping
// ============================================================================

#[tokio::test]
async fn test_error_status_codes() {
    let router = test_router();

    let (status, body) = call(&router, Method::POST, "/api/tables/404/bus", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = call(&router, Method::POST, "/api/tables/1/bus", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&router, Method::POST, "/api/waitlist", Some(json!({"name": "  ", "party": 2}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&router, Method::POST, "/api/waitlist", Some(json!({"name": "Big", "party": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&router, Method::PUT, "/api/rotation", Some(json!({"mode": "random"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&router, Method::PUT, "/api/servers/Nobody/duty", Some(json!({"on_duty": true}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &router,
        Method::POST,
        "/api/tables/2/seat",
        Some(json!({"party": "Walk-in", "party_size": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = call(&router, Method::GET, "/api/tables/2", None).await;
    assert_eq!(body["data"]["status"], "free");
}

#[tokio::test]
async fn test_missing_wait_does_not_seat() {
    let router = test_router();
    let ghost = uuid::Uuid::new_v4();

    let (status, _) = call(
        &router,
        Method::POST,
        "/api/tables/3/seat",
        Some(json!({"wait_id": ghost})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&router, Method::GET, "/api/tables/3", None).await;
    assert_eq!(body["data"]["status"], "free");
}

#[tokio::test]
async fn test_remove_unknown_wait_is_not_an_error() {
    let router = test_router();
    let ghost = uuid::Uuid::new_v4();

    let (status, body) = call(&router, Method::DELETE, &format!("/api/waitlist/{ghost}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], false);
}
