//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Task definitions
        .route("/tasks", get(handlers::list_tasks))
        .route("/tasks", post(handlers::create_task))
        // Scheduling pipeline
        .route("/schedule/generate", post(handlers::generate_schedule))
        .route("/schedule/quick", post(handlers::quick_schedule))
        // Instances and moves
        .route("/instances", get(handlers::list_instances))
        .route("/instances/{instance_id}/move", post(handlers::move_instance))
        // Audit trail
        .route("/conflict-records", get(handlers::list_conflict_records));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
