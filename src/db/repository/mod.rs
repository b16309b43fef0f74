//! Repository trait definitions.
//!
//! The traits split by entity the way the application consumes them; a
//! storage backend implements all of them and is handed around as
//! `Arc<dyn FullRepository>`.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::api::{InstanceId, TaskId, UserId};
use crate::models::instance::ScheduledInstance;
use crate::models::preferences::PreferenceSet;
use crate::models::task::TaskDefinition;
use crate::scheduler::moves::MoveConflictRecord;
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::OwnedMutexGuard;

/// Task definition and preference storage.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Store a new task definition, assigning its id.
    async fn create_task(&self, task: TaskDefinition) -> RepositoryResult<TaskDefinition>;

    /// Fetch one task definition.
    async fn get_task(&self, id: TaskId) -> RepositoryResult<TaskDefinition>;

    /// All active task definitions for a user.
    async fn list_active_tasks(&self, user_id: UserId) -> RepositoryResult<Vec<TaskDefinition>>;

    /// Learned preferences for a user; empty set when none were stored.
    async fn preferences_for(&self, user_id: UserId) -> RepositoryResult<PreferenceSet>;

    /// Replace a user's learned preferences.
    async fn store_preferences(
        &self,
        user_id: UserId,
        preferences: PreferenceSet,
    ) -> RepositoryResult<()>;
}

/// Scheduled instance storage.
#[async_trait]
pub trait InstanceRepository: Send + Sync {
    /// Fetch one scheduled instance.
    async fn get_instance(&self, id: InstanceId) -> RepositoryResult<ScheduledInstance>;

    /// All instances for a user with dates in `[from, to]`, every status.
    async fn instances_in_range(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<ScheduledInstance>>;

    /// Insert a single ad-hoc instance, assigning its id.
    async fn insert_instance(
        &self,
        instance: ScheduledInstance,
    ) -> RepositoryResult<ScheduledInstance>;

    /// Persist a generated week as one atomic batch.
    ///
    /// Either every instance is stored or none is; a validation failure on
    /// any element rolls the whole batch back.
    async fn commit_generated_week(
        &self,
        user_id: UserId,
        instances: Vec<ScheduledInstance>,
    ) -> RepositoryResult<Vec<ScheduledInstance>>;

    /// Apply a confirmed move as one atomic unit: the moved instance's new
    /// times, each shortened sibling's trimmed times, the displaced
    /// siblings' flags, and the audit records.
    async fn commit_move(
        &self,
        moved: ScheduledInstance,
        shortened: Vec<ScheduledInstance>,
        displaced: Vec<InstanceId>,
        records: Vec<MoveConflictRecord>,
    ) -> RepositoryResult<ScheduledInstance>;
}

/// Append-only move-audit storage.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// All move records for a user, oldest first.
    async fn conflict_records_for(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<Vec<MoveConflictRecord>>;
}

/// Combined repository interface used by the service layer.
#[async_trait]
pub trait FullRepository: TaskRepository + InstanceRepository + AuditRepository {
    /// Serialize scheduling runs per user, so two concurrent runs cannot
    /// compute availability from the same stale snapshot and double-book.
    async fn acquire_run_lock(&self, user_id: UserId) -> OwnedMutexGuard<()>;
}
