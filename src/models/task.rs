//! Task definitions: the user's recurring or one-off commitments.

use crate::api::{TaskId, UserId};
use crate::models::time::TimeSlot;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Category tag separating aspirational goals from routine chores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Goal,
    Chore,
}

/// Period over which a flexible task's frequency is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyPeriod {
    Day,
    Week,
}

/// Scheduling mode for a task. Exactly one mode is active per definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Explicit weekday set with an optional explicit start time.
    Fixed {
        weekdays: Vec<Weekday>,
        #[serde(skip_serializing_if = "Option::is_none")]
        at: Option<NaiveTime>,
    },
    /// Frequency count per period with an optional preferred time window
    /// and an optional restriction to specific weekdays.
    Flexible {
        frequency: u32,
        period: FrequencyPeriod,
        #[serde(skip_serializing_if = "Option::is_none")]
        preferred_window: Option<TimeSlot>,
        #[serde(default)]
        required_days: Vec<Weekday>,
    },
}

/// A user's recurring or one-off commitment.
///
/// Read-only to the engine within one scheduling run; created and edited
/// through the task endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    /// Database ID (optional on input, server-assigned)
    #[serde(default)]
    pub id: Option<TaskId>,
    /// Owning user
    pub user_id: UserId,
    /// Display name
    pub name: String,
    /// Goal vs chore
    pub kind: TaskKind,
    /// Duration of one instance in minutes
    pub duration_minutes: i64,
    /// Ordinal priority, lower = more important
    pub priority: i32,
    /// Scheduling mode
    #[serde(flatten)]
    pub mode: ScheduleMode,
    /// Inactive tasks are ignored by the generator
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl TaskDefinition {
    /// Validate the definition invariants.
    ///
    /// A fixed task with an empty weekday set is accepted but never
    /// expandable; it is reported here so callers can warn the user.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Task name must not be empty".to_string());
        }
        if self.duration_minutes <= 0 {
            return Err("Task duration must be positive".to_string());
        }
        match &self.mode {
            ScheduleMode::Fixed { weekdays, .. } => {
                if weekdays.is_empty() {
                    return Err("Fixed task needs at least one weekday".to_string());
                }
            }
            ScheduleMode::Flexible {
                frequency,
                preferred_window,
                ..
            } => {
                if *frequency < 1 {
                    return Err("Flexible task frequency must be at least 1".to_string());
                }
                if let Some(window) = preferred_window {
                    if window.duration_minutes() < self.duration_minutes {
                        return Err(format!(
                            "Preferred window {} is shorter than the task duration",
                            window
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// The fixed start time, when the task has one.
    pub fn fixed_time(&self) -> Option<NaiveTime> {
        match &self.mode {
            ScheduleMode::Fixed { at, .. } => *at,
            ScheduleMode::Flexible { .. } => None,
        }
    }

    /// The preferred window, when the task has one.
    pub fn preferred_window(&self) -> Option<TimeSlot> {
        match &self.mode {
            ScheduleMode::Flexible {
                preferred_window, ..
            } => *preferred_window,
            ScheduleMode::Fixed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn base_task(mode: ScheduleMode) -> TaskDefinition {
        TaskDefinition {
            id: Some(TaskId::new(1)),
            user_id: UserId::new(1),
            name: "Gym".to_string(),
            kind: TaskKind::Goal,
            duration_minutes: 45,
            priority: 2,
            mode,
            active: true,
        }
    }

    #[test]
    fn test_validate_flexible_ok() {
        let task = base_task(ScheduleMode::Flexible {
            frequency: 3,
            period: FrequencyPeriod::Week,
            preferred_window: TimeSlot::new(t(6, 0), t(9, 0)),
            required_days: vec![],
        });
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_frequency() {
        let task = base_task(ScheduleMode::Flexible {
            frequency: 0,
            period: FrequencyPeriod::Week,
            preferred_window: None,
            required_days: vec![],
        });
        assert!(task.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_fixed_weekdays() {
        let task = base_task(ScheduleMode::Fixed {
            weekdays: vec![],
            at: Some(t(9, 0)),
        });
        assert!(task.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_window_shorter_than_duration() {
        let task = base_task(ScheduleMode::Flexible {
            frequency: 1,
            period: FrequencyPeriod::Week,
            preferred_window: TimeSlot::new(t(6, 0), t(6, 30)),
            required_days: vec![],
        });
        assert!(task.validate().is_err());
    }

    #[test]
    fn test_fixed_time_accessor() {
        let task = base_task(ScheduleMode::Fixed {
            weekdays: vec![Weekday::Mon],
            at: Some(t(9, 0)),
        });
        assert_eq!(task.fixed_time(), Some(t(9, 0)));
        assert_eq!(task.preferred_window(), None);
    }

    #[test]
    fn test_mode_serde_roundtrip() {
        let task = base_task(ScheduleMode::Flexible {
            frequency: 2,
            period: FrequencyPeriod::Day,
            preferred_window: None,
            required_days: vec![Weekday::Tue, Weekday::Thu],
        });
        let json = serde_json::to_string(&task).unwrap();
        let back: TaskDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
