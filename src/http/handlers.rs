//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    ConflictRecordListResponse, GenerateScheduleRequest, HealthResponse, InstanceListResponse,
    InstanceRangeQuery, MoveInstanceBody, TaskListResponse, UserQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{InstanceId, UserId};
use crate::models::instance::ScheduledInstance;
use crate::models::task::TaskDefinition;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the
/// repository is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repository = match state.repository.list_active_tasks(UserId::new(0)).await {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository,
    }))
}

// =============================================================================
// Task CRUD
// =============================================================================

/// GET /v1/tasks?user_id=
///
/// List all active task definitions for a user.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> HandlerResult<TaskListResponse> {
    let tasks = state
        .repository
        .list_active_tasks(UserId::new(query.user_id))
        .await?;
    let total = tasks.len();

    Ok(Json(TaskListResponse { tasks, total }))
}

/// POST /v1/tasks
///
/// Create a new task definition.
pub async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<TaskDefinition>,
) -> Result<(axum::http::StatusCode, Json<TaskDefinition>), AppError> {
    let stored = state.repository.create_task(task).await?;
    Ok((axum::http::StatusCode::CREATED, Json(stored)))
}

// =============================================================================
// Scheduling
// =============================================================================

/// POST /v1/schedule/generate
///
/// Run the full pipeline for one user and week: expansion, advisory
/// optimization, validation, and transactional commit. Returns placements
/// and conflicts together; partial success is the expected common case.
pub async fn generate_schedule(
    State(state): State<AppState>,
    Json(request): Json<GenerateScheduleRequest>,
) -> HandlerResult<services::GenerateScheduleResponse> {
    let now = chrono::Local::now().naive_local();
    let response = services::generate_schedule(
        state.repository.as_ref(),
        state.calendar.as_ref(),
        state.blocked_time.as_ref(),
        state.optimizer.as_ref(),
        &state.config,
        request.user_id,
        request.week_start,
        now,
    )
    .await?;

    Ok(Json(response))
}

/// POST /v1/schedule/quick
///
/// Place a single ad-hoc instance at an explicit time.
pub async fn quick_schedule(
    State(state): State<AppState>,
    Json(request): Json<services::QuickScheduleRequest>,
) -> Result<(axum::http::StatusCode, Json<ScheduledInstance>), AppError> {
    let stored = services::quick_schedule(
        state.repository.as_ref(),
        state.calendar.as_ref(),
        state.blocked_time.as_ref(),
        &state.config,
        request,
    )
    .await?;

    Ok((axum::http::StatusCode::CREATED, Json(stored)))
}

/// POST /v1/instances/{instance_id}/move
///
/// Move a scheduled instance; returns a conflict preview unless confirmed.
pub async fn move_instance(
    State(state): State<AppState>,
    Path(instance_id): Path<i64>,
    Json(body): Json<MoveInstanceBody>,
) -> HandlerResult<services::MoveOutcome> {
    let outcome = services::move_instance(
        state.repository.as_ref(),
        &state.config,
        services::MoveInstanceRequest {
            instance_id: InstanceId::new(instance_id),
            new_start: body.new_start,
            new_end: body.new_end,
            confirmed: body.confirmed,
        },
        chrono::Utc::now(),
    )
    .await?;

    Ok(Json(outcome))
}

// =============================================================================
// Listings
// =============================================================================

/// GET /v1/instances?user_id=&from=&to=
///
/// List scheduled instances for a user in a date range.
pub async fn list_instances(
    State(state): State<AppState>,
    Query(query): Query<InstanceRangeQuery>,
) -> HandlerResult<InstanceListResponse> {
    let instances = state
        .repository
        .instances_in_range(UserId::new(query.user_id), query.from, query.to)
        .await?;
    let total = instances.len();

    Ok(Json(InstanceListResponse { instances, total }))
}

/// GET /v1/conflict-records?user_id=
///
/// List the move-audit trail for a user.
pub async fn list_conflict_records(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> HandlerResult<ConflictRecordListResponse> {
    let records = state
        .repository
        .conflict_records_for(UserId::new(query.user_id))
        .await?;
    let total = records.len();

    Ok(Json(ConflictRecordListResponse { records, total }))
}
