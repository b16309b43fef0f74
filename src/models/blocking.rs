//! Blocking intervals: everything that removes availability on a day.

use crate::models::time::TimeSlot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Source of a blocking interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    CalendarEvent,
    WorkHours,
    Commute,
    Vacation,
    Holiday,
    ScheduledTask,
}

impl BlockKind {
    /// Vacations and holidays remove the whole day; every other kind
    /// blocks only its own interval.
    pub fn blocks_whole_day(&self) -> bool {
        matches!(self, BlockKind::Vacation | BlockKind::Holiday)
    }
}

/// One interval that removes availability, with its provenance.
///
/// Computed fresh per scheduling run from the user's calendar, work-schedule
/// configuration, and holiday calendar; the engine never mutates the sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedInterval {
    pub date: NaiveDate,
    pub slot: TimeSlot,
    /// Human-readable label, e.g. the calendar event summary
    pub reason: String,
    pub kind: BlockKind,
}

impl BlockedInterval {
    pub fn new(date: NaiveDate, slot: TimeSlot, reason: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            date,
            slot,
            reason: reason.into(),
            kind,
        }
    }

    /// A whole-day block spanning the scheduling window, for vacations and
    /// holidays.
    pub fn whole_day(
        date: NaiveDate,
        window: TimeSlot,
        reason: impl Into<String>,
        kind: BlockKind,
    ) -> Self {
        Self::new(date, window, reason, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_whole_day_kinds() {
        assert!(BlockKind::Vacation.blocks_whole_day());
        assert!(BlockKind::Holiday.blocks_whole_day());
        assert!(!BlockKind::CalendarEvent.blocks_whole_day());
        assert!(!BlockKind::ScheduledTask.blocks_whole_day());
    }

    #[test]
    fn test_blocked_interval_new() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let slot = TimeSlot::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        )
        .unwrap();
        let block = BlockedInterval::new(date, slot, "Office", BlockKind::WorkHours);
        assert_eq!(block.kind, BlockKind::WorkHours);
        assert_eq!(block.slot.duration_minutes(), 480);
    }
}
