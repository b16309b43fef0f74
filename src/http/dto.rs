//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Engine and service types that already derive Serialize/Deserialize are
//! re-exported rather than duplicated.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    InstanceOutcome, ScheduledInstance, TaskDefinition, TaskId, TimeSlot, UserId,
};
pub use crate::scheduler::moves::{MoveConflictRecord, SiblingConflict};
pub use crate::services::{
    GenerateScheduleResponse, MoveInstanceRequest, MoveOutcome, Placement, QuickScheduleRequest,
    ScheduleConflict,
};
use chrono::{NaiveDate, NaiveTime};

/// Request body for generating a week's schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateScheduleRequest {
    /// User (or family member) to schedule for
    pub user_id: UserId,
    /// First day of the target week
    pub week_start: NaiveDate,
}

/// Request body for moving a scheduled instance.
///
/// The instance id comes from the URL path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveInstanceBody {
    pub new_start: NaiveTime,
    pub new_end: NaiveTime,
    #[serde(default)]
    pub confirmed: bool,
}

/// Query parameters selecting a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    pub user_id: i64,
}

/// Query parameters for listing instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRangeQuery {
    pub user_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Task list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskDefinition>,
    pub total: usize,
}

/// Instance list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceListResponse {
    pub instances: Vec<ScheduledInstance>,
    pub total: usize,
}

/// Conflict-record list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictRecordListResponse {
    pub records: Vec<MoveConflictRecord>,
    pub total: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub repository: String,
}
