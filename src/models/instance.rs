//! Task instances: concrete dated occurrences derived from task definitions,
//! and the placement outcomes the engine produces for them.

use crate::api::{InstanceId, TaskId, UserId};
use crate::models::time::TimeSlot;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// One concrete occurrence of a task to be placed in the week.
///
/// Derived by the recurrence expander; never persisted on its own until a
/// placement is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInstance {
    /// The task this instance belongs to
    pub task_id: TaskId,
    /// Owning user
    pub user_id: UserId,
    /// Task display name, carried for justification strings
    pub task_name: String,
    /// Assigned calendar date
    pub date: NaiveDate,
    /// Ordinal position within the week (1-based)
    pub ordinal: u32,
    /// Total instances of this task planned for the week
    pub total: u32,
    /// Duration in minutes, carried down from the definition
    pub duration_minutes: i64,
    /// Explicit start time, when the definition fixes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_time: Option<NaiveTime>,
    /// Preferred placement window, when the definition has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_window: Option<TimeSlot>,
    /// Ordinal priority inherited from the definition, lower = more important
    pub priority: i32,
}

impl TaskInstance {
    /// Batch-local key used to address optimizer proposals for this instance.
    pub fn batch_key(&self) -> String {
        format!("{}:{}:{}", self.task_id, self.date, self.ordinal)
    }
}

/// Final outcome for one instance: placed or explicitly in conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InstanceOutcome {
    Placed {
        instance: TaskInstance,
        slot: TimeSlot,
        /// Human-readable justification for the chosen time
        reasoning: String,
    },
    Conflict {
        instance: TaskInstance,
        /// The constraint that could not be met
        reason: String,
        /// Generic recovery suggestions for the user
        alternatives: Vec<String>,
    },
}

impl InstanceOutcome {
    pub fn instance(&self) -> &TaskInstance {
        match self {
            InstanceOutcome::Placed { instance, .. } => instance,
            InstanceOutcome::Conflict { instance, .. } => instance,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, InstanceOutcome::Placed { .. })
    }
}

/// Lifecycle status of a persisted instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    /// Holds its assigned time
    Scheduled,
    /// Displaced by a move; waiting for the user to resolve
    NeedsAttention,
    /// Skipped by the user; ignored by availability and move resolution
    Skipped,
}

/// A persisted, placed instance. Once accepted it becomes a blocking
/// interval for subsequent placements on the same day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInstance {
    /// Database ID (server-assigned)
    #[serde(default)]
    pub id: Option<InstanceId>,
    pub task_id: TaskId,
    pub user_id: UserId,
    pub task_name: String,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub status: InstanceStatus,
    /// Justification recorded at placement time
    pub reasoning: String,
    /// Time the instance held before its first manual move, kept for
    /// provenance; never overwritten by later moves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_slot: Option<TimeSlot>,
}

impl ScheduledInstance {
    /// Whether this instance blocks availability and participates in
    /// move-conflict resolution.
    pub fn is_blocking(&self) -> bool {
        self.status != InstanceStatus::Skipped
    }
}
