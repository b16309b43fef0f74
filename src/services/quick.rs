//! Ad-hoc single-instance placement.

use crate::api::{TaskId, UserId};
use crate::config::SchedulerConfig;
use crate::db::repository::FullRepository;
use crate::models::instance::{InstanceStatus, ScheduledInstance};
use crate::models::time::TimeSlot;
use crate::providers::{BlockedTimeProvider, CalendarProvider};
use crate::scheduler::availability::validate_time_in_slots;
use crate::services::error::{SchedulingError, ServiceResult};
use crate::services::generate::build_blocking_context;
use chrono::{NaiveDate, NaiveTime};
use log::info;
use serde::{Deserialize, Serialize};

/// Request to place one instance at an explicit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickScheduleRequest {
    pub user_id: UserId,
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Allow persisting even when the time overlaps existing commitments.
    #[serde(default)]
    pub record_overlap: bool,
}

/// Place a single ad-hoc instance.
///
/// Availability for the day is computed the same way a generation run does
/// it; an overlapping request is an error unless `record_overlap` is set,
/// in which case the overlap is noted in the stored reasoning.
pub async fn quick_schedule(
    repo: &dyn FullRepository,
    calendar: &dyn CalendarProvider,
    blocked_time: &dyn BlockedTimeProvider,
    cfg: &SchedulerConfig,
    request: QuickScheduleRequest,
) -> ServiceResult<ScheduledInstance> {
    let task = repo.get_task(request.task_id).await?;
    if task.user_id != request.user_id {
        return Err(SchedulingError::InvalidRequest(format!(
            "task {} does not belong to user {}",
            request.task_id, request.user_id
        )));
    }
    let slot = TimeSlot::new(request.start_time, request.end_time).ok_or_else(|| {
        SchedulingError::InvalidRequest("start time must precede end time".to_string())
    })?;

    let events = calendar
        .events_in_range(request.user_id, request.date, request.date)
        .await
        .map_err(|e| SchedulingError::ProviderUnavailable(format!("calendar provider: {}", e)))?;
    let blocked = blocked_time
        .blocked_intervals(request.user_id, request.date, request.date)
        .await
        .map_err(|e| {
            SchedulingError::ProviderUnavailable(format!("blocked-time provider: {}", e))
        })?;
    let existing = repo
        .instances_in_range(request.user_id, request.date, request.date)
        .await?;

    let ctx = build_blocking_context(cfg, request.date, &blocked, &events, &existing);
    let availability = ctx.availability_for(request.date);
    let fits = validate_time_in_slots(&availability, &slot);

    if !fits && !request.record_overlap {
        return Err(SchedulingError::OverlapRejected(format!(
            "{} on {}",
            slot, request.date
        )));
    }

    let reasoning = if fits {
        "scheduled manually".to_string()
    } else {
        "scheduled manually, overlapping existing commitments".to_string()
    };
    let stored = repo
        .insert_instance(ScheduledInstance {
            id: None,
            task_id: request.task_id,
            user_id: request.user_id,
            task_name: task.name,
            date: request.date,
            slot,
            status: InstanceStatus::Scheduled,
            reasoning,
            original_slot: None,
        })
        .await?;
    info!(
        "quick_schedule user={} task={} {} {}",
        request.user_id, request.task_id, request.date, slot
    );
    Ok(stored)
}
