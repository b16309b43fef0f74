//! Recurrence expansion: turning one task definition into the concrete
//! dated instances still achievable in a target week.

use crate::models::instance::TaskInstance;
use crate::models::preferences::PreferenceSet;
use crate::models::task::{FrequencyPeriod, ScheduleMode, TaskDefinition};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use log::debug;
use std::collections::HashSet;

/// Result of expanding one task over one week.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    /// Instances that can still be placed this week, in date order.
    pub instances: Vec<TaskInstance>,
    /// All dates that passed the skip rules, before spreading.
    pub candidate_dates: Vec<NaiveDate>,
}

/// Expand a task over `[week_start, week_end]`.
///
/// Dates before today, today when the task's fixed time has already elapsed,
/// dates already carrying an instance, and dates outside the allowed weekday
/// set are skipped silently; exhausting the week this way is normal and
/// yields an empty expansion, never an error.
pub fn expand(
    task: &TaskDefinition,
    week_start: NaiveDate,
    week_end: NaiveDate,
    already_scheduled: &HashSet<NaiveDate>,
    prefs: &PreferenceSet,
    now: NaiveDateTime,
) -> Expansion {
    let task_id = match task.id {
        Some(id) => id,
        // Unsaved definitions have nothing to expand against.
        None => return Expansion::default(),
    };

    let allowed_days = allowed_weekdays(task);
    if matches!(&task.mode, ScheduleMode::Fixed { weekdays, .. } if weekdays.is_empty()) {
        // A fixed task with no weekday set is never expandable.
        return Expansion::default();
    }

    let today = now.date();
    let mut candidates = Vec::new();
    let mut date = week_start;
    while date <= week_end {
        let skip = date < today
            || (date == today && fixed_time_elapsed(task, now))
            || already_scheduled.contains(&date)
            || allowed_days
                .as_ref()
                .is_some_and(|days| !days.contains(&date.weekday()));
        if !skip {
            candidates.push(date);
        }
        date += Duration::days(1);
    }

    let already_count = already_scheduled.len() as u32;
    let chosen = match &task.mode {
        // One instance per remaining allowed day.
        ScheduleMode::Fixed { .. } => candidates.iter().map(|d| (*d, 1u32)).collect::<Vec<_>>(),
        ScheduleMode::Flexible {
            frequency, period, ..
        } => match period {
            FrequencyPeriod::Day => candidates
                .iter()
                .map(|d| (*d, *frequency))
                .collect::<Vec<_>>(),
            FrequencyPeriod::Week => {
                let needed = frequency
                    .saturating_sub(already_count)
                    .min(candidates.len() as u32);
                spread_dates(&candidates, needed as usize)
                    .into_iter()
                    .map(|d| (d, 1u32))
                    .collect()
            }
        },
    };

    let new_count: u32 = chosen.iter().map(|(_, n)| *n).sum();
    let total = already_count + new_count;
    debug!(
        "expand task={} week={}..{}: {} candidate day(s), {} new instance(s)",
        task_id, week_start, week_end, candidates.len(), new_count
    );

    let duration = effective_duration(task, prefs);
    let window = task
        .preferred_window()
        .or_else(|| prefs.window_for(task.kind));

    let mut instances = Vec::with_capacity(new_count as usize);
    let mut ordinal = already_count;
    for (date, per_day) in chosen {
        for _ in 0..per_day {
            ordinal += 1;
            instances.push(TaskInstance {
                task_id,
                user_id: task.user_id,
                task_name: task.name.clone(),
                date,
                ordinal,
                total,
                duration_minutes: duration,
                fixed_time: task.fixed_time(),
                preferred_window: window,
                priority: task.priority,
            });
        }
    }

    Expansion {
        instances,
        candidate_dates: candidates,
    }
}

/// The weekday restriction in effect, when one exists.
fn allowed_weekdays(task: &TaskDefinition) -> Option<HashSet<Weekday>> {
    match &task.mode {
        ScheduleMode::Fixed { weekdays, .. } => Some(weekdays.iter().copied().collect()),
        ScheduleMode::Flexible { required_days, .. } if !required_days.is_empty() => {
            Some(required_days.iter().copied().collect())
        }
        ScheduleMode::Flexible { .. } => None,
    }
}

/// Whether the task's fixed time has already passed relative to `now`.
fn fixed_time_elapsed(task: &TaskDefinition, now: NaiveDateTime) -> bool {
    task.fixed_time().is_some_and(|at| at <= now.time())
}

/// Learned duration correction applied to the definition's duration.
fn effective_duration(task: &TaskDefinition, prefs: &PreferenceSet) -> i64 {
    (task.duration_minutes + prefs.duration_delta_for(task.kind)).max(5)
}

/// Choose `needed` dates spread evenly across the candidate set.
///
/// Uses the stride `candidates / needed` rather than taking the earliest
/// dates, so a low-frequency task does not cluster at the start of the week.
/// On an index collision the next unassigned candidate is taken.
fn spread_dates(candidates: &[NaiveDate], needed: usize) -> Vec<NaiveDate> {
    if needed == 0 || candidates.is_empty() {
        return Vec::new();
    }
    if needed >= candidates.len() {
        return candidates.to_vec();
    }

    let mut taken = vec![false; candidates.len()];
    let mut chosen = Vec::with_capacity(needed);
    for i in 0..needed {
        let ideal = i * candidates.len() / needed;
        let idx = (ideal..candidates.len())
            .chain(0..ideal)
            .find(|&j| !taken[j])
            .expect("needed < candidates.len() leaves a free index");
        taken[idx] = true;
        chosen.push(candidates[idx]);
    }
    chosen.sort();
    chosen
}

#[cfg(test)]
#[path = "recurrence_tests.rs"]
mod recurrence_tests;
