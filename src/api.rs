//! Public API surface for the scheduling backend.
//!
//! This file consolidates the identifier newtypes shared by the engine, the
//! repository layer, and the HTTP DTOs. All types derive Serialize/Deserialize
//! for JSON serialization.

use serde::{Deserialize, Serialize};

/// User identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Task definition identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub i64);

/// Scheduled instance identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        UserId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl TaskId {
    pub fn new(value: i64) -> Self {
        TaskId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl InstanceId {
    pub fn new(value: i64) -> Self {
        InstanceId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}
impl From<TaskId> for i64 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}
impl From<InstanceId> for i64 {
    fn from(id: InstanceId) -> Self {
        id.0
    }
}

pub use crate::models::blocking::{BlockKind, BlockedInterval};
pub use crate::models::instance::{
    InstanceOutcome, InstanceStatus, ScheduledInstance, TaskInstance,
};
pub use crate::models::task::{FrequencyPeriod, ScheduleMode, TaskDefinition, TaskKind};
pub use crate::models::time::TimeSlot;
pub use crate::providers::calendar::CalendarEvent;
