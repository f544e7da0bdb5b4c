//! Common test helpers for integration tests.
//!
//! # Note
//!
//! Each integration test file is compiled as its own crate, so helpers used
//! by only one of them would otherwise warn as dead code in the other.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use task_tracker::api::{AppState, router};
use task_tracker::config::ServerConfig;
use task_tracker::domain::{Task, TaskDraft};
use task_tracker::infrastructure::InMemoryTaskRepository;

// =============================================================================
// AppState Creation Helpers
// =============================================================================

/// Creates a test `AppState` over an empty in-memory store.
pub fn create_test_app_state() -> AppState {
    AppState::from_repository(Arc::new(InMemoryTaskRepository::new()))
}

/// Stores a task directly through the service.
pub async fn create_saved_task(state: &AppState, draft: TaskDraft) -> Task {
    state
        .service
        .create(draft)
        .await
        .expect("in-memory create should succeed")
}

// =============================================================================
// Router Helpers
// =============================================================================

/// Builds the router with the default configuration.
pub fn create_test_router(state: AppState) -> Router {
    router(state, &ServerConfig::default())
}

/// Builds the router from environment-style variables.
pub fn create_configured_router(state: AppState, variables: &[(&str, &str)]) -> Router {
    let config = ServerConfig::from_lookup(|key| {
        variables
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).to_string())
    })
    .expect("test configuration should be valid");
    router(state, &config)
}

/// Sends a request through the router and returns the status and JSON body
/// (`Value::Null` for an empty body).
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, body)
}

/// Builds a JSON request.
pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

/// Builds a request without a body.
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

// =============================================================================
// Live Server
// =============================================================================

/// Serves the router on an ephemeral local port and returns the API base URL.
pub async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let address = listener.local_addr().expect("listener has an address");
    let application = create_test_router(create_test_app_state());

    tokio::spawn(async move {
        axum::serve(listener, application)
            .await
            .expect("test server should run");
    });

    format!("http://{address}/api")
}
