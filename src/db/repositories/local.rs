//! In-memory repository implementation.
//!
//! Backs unit tests and local development. Writes that the trait contract
//! declares transactional are validated up front and applied under one lock
//! acquisition, so a failing batch leaves no partial state behind.

use crate::api::{InstanceId, TaskId, UserId};
use crate::db::repository::{
    AuditRepository, ErrorContext, FullRepository, InstanceRepository, RepositoryError,
    RepositoryResult, TaskRepository,
};
use crate::models::instance::{InstanceStatus, ScheduledInstance};
use crate::models::preferences::PreferenceSet;
use crate::models::task::TaskDefinition;
use crate::scheduler::moves::MoveConflictRecord;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// In-memory storage for tasks, instances, preferences, and audit records.
pub struct LocalRepository {
    tasks: RwLock<HashMap<TaskId, TaskDefinition>>,
    instances: RwLock<HashMap<InstanceId, ScheduledInstance>>,
    preferences: RwLock<HashMap<UserId, PreferenceSet>>,
    records: RwLock<Vec<MoveConflictRecord>>,
    next_task_id: AtomicI64,
    next_instance_id: AtomicI64,
    run_locks: Mutex<HashMap<UserId, Arc<tokio::sync::Mutex<()>>>>,
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            instances: RwLock::new(HashMap::new()),
            preferences: RwLock::new(HashMap::new()),
            records: RwLock::new(Vec::new()),
            next_task_id: AtomicI64::new(1),
            next_instance_id: AtomicI64::new(1),
            run_locks: Mutex::new(HashMap::new()),
        }
    }

    fn next_task_id(&self) -> TaskId {
        TaskId::new(self.next_task_id.fetch_add(1, Ordering::SeqCst))
    }

    fn next_instance_id(&self) -> InstanceId {
        InstanceId::new(self.next_instance_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Reject a generated batch that overlaps existing blocking instances
    /// or overlaps within itself. Called with the write lock held so the
    /// check and the insert are one atomic step.
    fn validate_batch(
        existing: &HashMap<InstanceId, ScheduledInstance>,
        user_id: UserId,
        batch: &[ScheduledInstance],
    ) -> RepositoryResult<()> {
        for (i, instance) in batch.iter().enumerate() {
            if instance.user_id != user_id {
                return Err(RepositoryError::validation_with_context(
                    "instance does not belong to the committing user",
                    ErrorContext::new("commit_generated_week").with_entity("instance"),
                ));
            }
            let clashes_existing = existing.values().any(|other| {
                other.user_id == user_id
                    && other.date == instance.date
                    && other.is_blocking()
                    && other.slot.overlaps(&instance.slot)
            });
            let clashes_batch = batch[..i].iter().any(|other| {
                other.date == instance.date && other.slot.overlaps(&instance.slot)
            });
            if clashes_existing || clashes_batch {
                return Err(overlap_error(instance));
            }
        }
        Ok(())
    }
}

fn overlap_error(instance: &ScheduledInstance) -> RepositoryError {
    RepositoryError::TransactionError {
        message: "placement overlaps an existing instance; batch rolled back".to_string(),
        context: ErrorContext::new("commit_generated_week")
            .with_entity("instance")
            .with_details(format!(
                "task {} on {} at {}",
                instance.task_id, instance.date, instance.slot
            )),
    }
}

#[async_trait]
impl TaskRepository for LocalRepository {
    async fn create_task(&self, mut task: TaskDefinition) -> RepositoryResult<TaskDefinition> {
        task.validate().map_err(|reason| {
            RepositoryError::validation_with_context(
                reason,
                ErrorContext::new("create_task").with_entity("task"),
            )
        })?;
        let id = self.next_task_id();
        task.id = Some(id);
        self.tasks.write().insert(id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> RepositoryResult<TaskDefinition> {
        self.tasks.read().get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("task {} not found", id),
                ErrorContext::new("get_task").with_entity("task").with_entity_id(id),
            )
        })
    }

    async fn list_active_tasks(&self, user_id: UserId) -> RepositoryResult<Vec<TaskDefinition>> {
        let mut tasks: Vec<_> = self
            .tasks
            .read()
            .values()
            .filter(|task| task.user_id == user_id && task.active)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| task.id);
        Ok(tasks)
    }

    async fn preferences_for(&self, user_id: UserId) -> RepositoryResult<PreferenceSet> {
        Ok(self
            .preferences
            .read()
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn store_preferences(
        &self,
        user_id: UserId,
        preferences: PreferenceSet,
    ) -> RepositoryResult<()> {
        self.preferences.write().insert(user_id, preferences);
        Ok(())
    }
}

#[async_trait]
impl InstanceRepository for LocalRepository {
    async fn get_instance(&self, id: InstanceId) -> RepositoryResult<ScheduledInstance> {
        self.instances.read().get(&id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("instance {} not found", id),
                ErrorContext::new("get_instance")
                    .with_entity("instance")
                    .with_entity_id(id),
            )
        })
    }

    async fn instances_in_range(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<ScheduledInstance>> {
        let mut instances: Vec<_> = self
            .instances
            .read()
            .values()
            .filter(|i| i.user_id == user_id && i.date >= from && i.date <= to)
            .cloned()
            .collect();
        instances.sort_by_key(|i| (i.date, i.slot.start, i.id));
        Ok(instances)
    }

    async fn insert_instance(
        &self,
        mut instance: ScheduledInstance,
    ) -> RepositoryResult<ScheduledInstance> {
        let id = self.next_instance_id();
        instance.id = Some(id);
        self.instances.write().insert(id, instance.clone());
        Ok(instance)
    }

    async fn commit_generated_week(
        &self,
        user_id: UserId,
        batch: Vec<ScheduledInstance>,
    ) -> RepositoryResult<Vec<ScheduledInstance>> {
        let mut store = self.instances.write();
        Self::validate_batch(&store, user_id, &batch)?;

        let mut stored = Vec::with_capacity(batch.len());
        for mut instance in batch {
            let id = self.next_instance_id();
            instance.id = Some(id);
            store.insert(id, instance.clone());
            stored.push(instance);
        }
        Ok(stored)
    }

    async fn commit_move(
        &self,
        moved: ScheduledInstance,
        shortened: Vec<ScheduledInstance>,
        displaced: Vec<InstanceId>,
        records: Vec<MoveConflictRecord>,
    ) -> RepositoryResult<ScheduledInstance> {
        let moved_id = moved.id.ok_or_else(|| {
            RepositoryError::validation_with_context(
                "moved instance has no id",
                ErrorContext::new("commit_move").with_entity("instance"),
            )
        })?;

        let mut store = self.instances.write();

        // Verify every touched row exists before mutating anything.
        let mut touched = vec![moved_id];
        touched.extend(shortened.iter().filter_map(|s| s.id));
        touched.extend(displaced.iter().copied());
        for id in &touched {
            if !store.contains_key(id) {
                return Err(RepositoryError::not_found_with_context(
                    format!("instance {} not found", id),
                    ErrorContext::new("commit_move")
                        .with_entity("instance")
                        .with_entity_id(*id),
                ));
            }
        }

        store.insert(moved_id, moved.clone());
        for sibling in shortened {
            if let Some(id) = sibling.id {
                store.insert(id, sibling);
            }
        }
        for id in displaced {
            if let Some(instance) = store.get_mut(&id) {
                instance.status = InstanceStatus::NeedsAttention;
            }
        }
        drop(store);

        self.records.write().extend(records);
        Ok(moved)
    }
}

#[async_trait]
impl AuditRepository for LocalRepository {
    async fn conflict_records_for(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<Vec<MoveConflictRecord>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn acquire_run_lock(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.run_locks.lock();
            Arc::clone(locks.entry(user_id).or_default())
        };
        lock.lock_owned().await
    }
}
