//! Weekly schedule generation.
//!
//! Orchestrates the full pipeline for one user and one week: recurrence
//! expansion, advisory optimizer proposals, validation and gap-filling, and
//! a single transactional commit of the results.

use crate::api::{TaskId, UserId};
use crate::config::SchedulerConfig;
use crate::db::repository::FullRepository;
use crate::models::blocking::{BlockKind, BlockedInterval};
use crate::models::instance::{InstanceOutcome, InstanceStatus, ScheduledInstance, TaskInstance};
use crate::models::time::week_dates;
use crate::providers::{BlockedTimeProvider, CalendarProvider};
use crate::scheduler::optimizer::{index_proposals, DayBatch, OptimizerBatch, OptimizerStrategy};
use crate::scheduler::reconcile::{reconcile, BlockingContext};
use crate::scheduler::recurrence::expand;
use crate::services::error::{SchedulingError, ServiceResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One committed placement in the generation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub instance_id: i64,
    pub task_id: TaskId,
    pub task_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reasoning: String,
}

/// One unplaceable instance in the generation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub task_id: TaskId,
    pub task_name: String,
    pub date: NaiveDate,
    pub reason: String,
    pub alternatives: Vec<String>,
}

/// Result of one generation run. Partial success is the expected common
/// case: placements and conflicts are returned together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateScheduleResponse {
    pub placements: Vec<Placement>,
    pub conflicts: Vec<ScheduleConflict>,
    pub summary: String,
}

/// Generate and persist the schedule for one user's week.
///
/// The run takes a per-user lock, snapshots all blocking sources, expands
/// every active task, lets the optimizer strategy propose start times
/// (advisory; failure or timeout degrades to zero proposals), reconciles,
/// and commits all placements in one transaction.
#[allow(clippy::too_many_arguments)]
pub async fn generate_schedule(
    repo: &dyn FullRepository,
    calendar: &dyn CalendarProvider,
    blocked_time: &dyn BlockedTimeProvider,
    optimizer: &dyn OptimizerStrategy,
    cfg: &SchedulerConfig,
    user_id: UserId,
    week_start: NaiveDate,
    now: NaiveDateTime,
) -> ServiceResult<GenerateScheduleResponse> {
    let _run_guard = repo.acquire_run_lock(user_id).await;
    let week_end = week_start + Duration::days(6);
    info!(
        "generate_schedule user={} week={}..{}",
        user_id, week_start, week_end
    );

    let tasks = repo.list_active_tasks(user_id).await?;
    let prefs = repo.preferences_for(user_id).await?;
    let existing = repo
        .instances_in_range(user_id, week_start, week_end)
        .await?;

    let provider_timeout = std::time::Duration::from_secs(cfg.provider_timeout_secs);
    let (events, blocked) = futures::join!(
        tokio::time::timeout(
            provider_timeout,
            calendar.events_in_range(user_id, week_start, week_end),
        ),
        tokio::time::timeout(
            provider_timeout,
            blocked_time.blocked_intervals(user_id, week_start, week_end),
        )
    );
    let events = events
        .map_err(|_| SchedulingError::ProviderUnavailable("calendar provider timed out".into()))?
        .map_err(|e| SchedulingError::ProviderUnavailable(format!("calendar provider: {}", e)))?;
    let blocked = blocked
        .map_err(|_| {
            SchedulingError::ProviderUnavailable("blocked-time provider timed out".into())
        })?
        .map_err(|e| {
            SchedulingError::ProviderUnavailable(format!("blocked-time provider: {}", e))
        })?;

    // Expand every task against the dates it already occupies.
    let mut instances: Vec<TaskInstance> = Vec::new();
    for task in &tasks {
        let already: HashSet<NaiveDate> = existing
            .iter()
            .filter(|i| Some(i.task_id) == task.id && i.is_blocking())
            .map(|i| i.date)
            .collect();
        let expansion = expand(task, week_start, week_end, &already, &prefs, now);
        instances.extend(expansion.instances);
    }
    debug!("expanded {} instance(s) from {} task(s)", instances.len(), tasks.len());

    let mut ctx = build_blocking_context(cfg, week_start, &blocked, &events, &existing);

    let proposals = if instances.is_empty() {
        HashMap::new()
    } else {
        let batch = build_batch(&instances, &ctx);
        match tokio::time::timeout(
            std::time::Duration::from_secs(cfg.optimizer_timeout_secs),
            optimizer.propose(&batch),
        )
        .await
        {
            Ok(Ok(proposals)) => index_proposals(proposals),
            Ok(Err(e)) => {
                warn!("optimizer strategy failed ({}); falling back to deterministic placement", e);
                HashMap::new()
            }
            Err(_) => {
                warn!("optimizer strategy timed out; falling back to deterministic placement");
                HashMap::new()
            }
        }
    };

    let total = instances.len();
    let outcomes = reconcile(&proposals, instances, &mut ctx);

    let mut to_store = Vec::new();
    let mut conflicts = Vec::new();
    for outcome in &outcomes {
        match outcome {
            InstanceOutcome::Placed {
                instance,
                slot,
                reasoning,
            } => to_store.push(ScheduledInstance {
                id: None,
                task_id: instance.task_id,
                user_id,
                task_name: instance.task_name.clone(),
                date: instance.date,
                slot: *slot,
                status: InstanceStatus::Scheduled,
                reasoning: reasoning.clone(),
                original_slot: None,
            }),
            InstanceOutcome::Conflict {
                instance,
                reason,
                alternatives,
            } => conflicts.push(ScheduleConflict {
                task_id: instance.task_id,
                task_name: instance.task_name.clone(),
                date: instance.date,
                reason: reason.clone(),
                alternatives: alternatives.clone(),
            }),
        }
    }

    let stored = repo.commit_generated_week(user_id, to_store).await?;
    let placements: Vec<Placement> = stored
        .into_iter()
        .map(|instance| Placement {
            instance_id: instance.id.map(|id| id.value()).unwrap_or_default(),
            task_id: instance.task_id,
            task_name: instance.task_name,
            date: instance.date,
            start_time: instance.slot.start,
            end_time: instance.slot.end,
            reasoning: instance.reasoning,
        })
        .collect();

    let summary = format!(
        "Scheduled {} of {} instance(s) for the week of {}; {} conflict(s).",
        placements.len(),
        total,
        week_start,
        conflicts.len()
    );
    info!("{}", summary);

    Ok(GenerateScheduleResponse {
        placements,
        conflicts,
        summary,
    })
}

/// Snapshot all blocking sources for the week into one context.
pub(crate) fn build_blocking_context(
    cfg: &SchedulerConfig,
    week_start: NaiveDate,
    blocked: &[BlockedInterval],
    events: &[crate::providers::CalendarEvent],
    existing: &[ScheduledInstance],
) -> BlockingContext {
    let window = cfg.day_window();
    let dates = week_dates(week_start);

    let mut blocking: Vec<BlockedInterval> = blocked.to_vec();
    for event in events {
        blocking.extend(event.blocked_intervals(&dates, window));
    }
    for instance in existing.iter().filter(|i| i.is_blocking()) {
        blocking.push(BlockedInterval::new(
            instance.date,
            instance.slot,
            instance.task_name.clone(),
            BlockKind::ScheduledTask,
        ));
    }
    BlockingContext::new(blocking, window, cfg.slot_granularity_minutes)
}

/// Group instances by day with the availability seen before any placement.
fn build_batch(instances: &[TaskInstance], ctx: &BlockingContext) -> OptimizerBatch {
    let mut by_date: HashMap<NaiveDate, Vec<TaskInstance>> = HashMap::new();
    for instance in instances {
        by_date.entry(instance.date).or_default().push(instance.clone());
    }
    let mut days: Vec<DayBatch> = by_date
        .into_iter()
        .map(|(date, instances)| DayBatch {
            date,
            availability: ctx.availability_for(date),
            instances,
        })
        .collect();
    days.sort_by_key(|day| day.date);
    OptimizerBatch { days }
}
