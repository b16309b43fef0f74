//! Learned per-user scheduling preferences.
//!
//! Each preference kind is a distinct variant with typed payloads and
//! explicit accessors, rather than an open string-keyed map, so shape drift
//! fails at deserialization time instead of silently at read time.

use crate::api::UserId;
use crate::models::task::TaskKind;
use crate::models::time::TimeSlot;
use serde::{Deserialize, Serialize};

/// One learned preference for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "preference", rename_all = "snake_case")]
pub enum LearnedPreference {
    /// Preferred placement window for tasks of a kind that carry no
    /// explicit window of their own.
    TimeWindow { kind: TaskKind, window: TimeSlot },
    /// Duration correction observed from completions, in minutes.
    DurationAdjustment { kind: TaskKind, delta_minutes: i64 },
    /// Flag marking tasks of a kind as sensitive to back-to-back placement.
    Sensitivity { kind: TaskKind, flag: bool },
}

impl LearnedPreference {
    pub fn task_kind(&self) -> TaskKind {
        match self {
            LearnedPreference::TimeWindow { kind, .. } => *kind,
            LearnedPreference::DurationAdjustment { kind, .. } => *kind,
            LearnedPreference::Sensitivity { kind, .. } => *kind,
        }
    }

    pub fn as_time_window(&self) -> Option<TimeSlot> {
        match self {
            LearnedPreference::TimeWindow { window, .. } => Some(*window),
            _ => None,
        }
    }

    pub fn as_duration_adjustment(&self) -> Option<i64> {
        match self {
            LearnedPreference::DurationAdjustment { delta_minutes, .. } => Some(*delta_minutes),
            _ => None,
        }
    }
}

/// The preference set the generator consults for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceSet {
    pub preferences: Vec<LearnedPreference>,
}

impl PreferenceSet {
    pub fn new(preferences: Vec<LearnedPreference>) -> Self {
        Self { preferences }
    }

    /// Fallback window for a task kind, when one was learned.
    pub fn window_for(&self, kind: TaskKind) -> Option<TimeSlot> {
        self.preferences
            .iter()
            .filter(|p| p.task_kind() == kind)
            .find_map(LearnedPreference::as_time_window)
    }

    /// Learned duration correction for a task kind, zero when none.
    pub fn duration_delta_for(&self, kind: TaskKind) -> i64 {
        self.preferences
            .iter()
            .filter(|p| p.task_kind() == kind)
            .find_map(LearnedPreference::as_duration_adjustment)
            .unwrap_or(0)
    }
}

/// Preferences stored for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: UserId,
    #[serde(flatten)]
    pub set: PreferenceSet,
}
