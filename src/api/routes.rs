//! Router assembly.

use axum::{
    Router,
    http::{HeaderValue, Method, request::Parts},
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_task, delete_task, get_task, health_check, list_tasks, update_task,
};
use crate::config::{CorsConfig, ServerConfig};

/// Builds the application router.
///
/// Task routes live under `config.base_path`; `/health` is always at the
/// root.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let tasks = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        );

    let application = Router::new().route("/health", get(health_check));
    // axum refuses to nest at the root, so an empty base path merges instead.
    let application = if config.base_path.is_empty() {
        application.merge(tasks)
    } else {
        application.nest(&config.base_path, tasks)
    };

    application
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors))
        .with_state(state)
}

/// Builds the CORS layer from the configured origins and patterns.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let config = config.clone();
    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
        origin
            .to_str()
            .is_ok_and(|origin| config.is_allowed(origin))
    });

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
