//! HTTP handlers for the task endpoints.
//!
//! Each handler takes its extractors as `Result`s so that malformed paths
//! and bodies are reported through [`ApiErrorResponse`] as 400s rather
//! than axum's default rejection responses.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::Serialize;

use super::dto::{TaskRequest, TaskResponse, validate_task_request};
use super::error::ApiErrorResponse;
use crate::domain::{TaskId, TaskService};
use crate::infrastructure::TaskRepository;

// =============================================================================
// Application State
// =============================================================================

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Task service backed by the configured repository.
    pub service: TaskService,
}

impl AppState {
    /// Creates a new `AppState` over an initialized repository.
    #[must_use]
    pub fn from_repository(repository: Arc<dyn TaskRepository>) -> Self {
        Self {
            service: TaskService::new(repository),
        }
    }
}

fn task_id(path: Result<Path<i64>, PathRejection>) -> Result<TaskId, ApiErrorResponse> {
    let Path(id) = path?;
    Ok(TaskId::new(id))
}

// =============================================================================
// Task Handlers
// =============================================================================

/// `GET /tasks`: lists every task.
///
/// # Errors
///
/// Returns 500 if the store fails.
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let tasks = state.service.list_all().await?;
    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

/// `GET /tasks/{id}`: fetches one task.
///
/// # Errors
///
/// - **400 Bad Request**: the id is not an integer
/// - **404 Not Found**: no task has that id
pub async fn get_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let id = task_id(path)?;
    let task = state.service.get_by_id(id).await?;
    Ok(Json(TaskResponse::from(task)))
}

/// `POST /tasks`: creates a task.
///
/// Any `id` in the body is ignored; the store assigns a fresh one.
///
/// # Response
///
/// - **201 Created**: the stored task
///
/// # Errors
///
/// - **400 Bad Request**: malformed body or validation failure
/// - **500 Internal Server Error**: the store failed
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErrorResponse> {
    let Json(request) = body?;
    let draft = validate_task_request(&request)?;
    let task = state.service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// `PUT /tasks/{id}`: replaces a task's writable fields.
///
/// Fields omitted from the body are cleared; an omitted status resets to
/// `TODO`.
///
/// # Errors
///
/// - **400 Bad Request**: malformed id, malformed body or validation failure
/// - **404 Not Found**: no task has that id
pub async fn update_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let id = task_id(path)?;
    let Json(request) = body?;
    let draft = validate_task_request(&request)?;
    let task = state.service.update(id, draft).await?;
    Ok(Json(TaskResponse::from(task)))
}

/// `DELETE /tasks/{id}`: removes a task.
///
/// # Errors
///
/// - **400 Bad Request**: the id is not an integer
/// - **404 Not Found**: no task has that id
pub async fn delete_task(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiErrorResponse> {
    let id = task_id(path)?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Health Check Handler
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint, mounted outside the API base path.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
