use chrono::{Duration, NaiveDate, NaiveTime};
use serde::*;

/// A contiguous clock-time interval within a single day.
///
/// Start is inclusive, end is exclusive. A slot is never inverted or empty;
/// use [`TimeSlot::new`] to enforce this at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Create a new slot. Returns `None` for inverted or zero-length intervals.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Slot from `start` lasting `minutes`. `None` if the end would cross midnight.
    pub fn from_start_duration(start: NaiveTime, minutes: i64) -> Option<Self> {
        let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(minutes));
        if wrapped != 0 {
            return None;
        }
        Self::new(start, end)
    }

    /// Length of the slot in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if a given instant lies inside this slot (inclusive start, exclusive end).
    pub fn contains_time(&self, t: NaiveTime) -> bool {
        self.start <= t && t < self.end
    }

    /// Check if `other` is wholly contained in this slot.
    pub fn contains_slot(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if this slot overlaps with another.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Length of the overlap with `other` in minutes, zero when disjoint.
    pub fn overlap_minutes(&self, other: &Self) -> i64 {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            (end - start).num_minutes()
        } else {
            0
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// The seven dates of the week starting at `week_start`.
pub fn week_dates(week_start: NaiveDate) -> Vec<NaiveDate> {
    (0..7)
        .map(|offset| week_start + Duration::days(offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(sh: u32, sm: u32, eh: u32, em: u32) -> TimeSlot {
        TimeSlot::new(t(sh, sm), t(eh, em)).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted() {
        assert!(TimeSlot::new(t(10, 0), t(9, 0)).is_none());
        assert!(TimeSlot::new(t(10, 0), t(10, 0)).is_none());
    }

    #[test]
    fn test_from_start_duration() {
        let s = TimeSlot::from_start_duration(t(7, 0), 30).unwrap();
        assert_eq!(s.end, t(7, 30));
        // Crossing midnight is not a valid single-day slot.
        assert!(TimeSlot::from_start_duration(t(23, 30), 60).is_none());
    }

    #[test]
    fn test_duration_minutes() {
        assert_eq!(slot(8, 0, 17, 0).duration_minutes(), 540);
        assert_eq!(slot(9, 15, 9, 30).duration_minutes(), 15);
    }

    #[test]
    fn test_contains_time_half_open() {
        let s = slot(9, 0, 10, 0);
        assert!(s.contains_time(t(9, 0)));
        assert!(s.contains_time(t(9, 59)));
        assert!(!s.contains_time(t(10, 0)));
    }

    #[test]
    fn test_contains_slot() {
        let outer = slot(8, 0, 12, 0);
        assert!(outer.contains_slot(&slot(8, 0, 12, 0)));
        assert!(outer.contains_slot(&slot(9, 0, 10, 0)));
        assert!(!outer.contains_slot(&slot(11, 30, 12, 30)));
    }

    #[test]
    fn test_overlaps() {
        let a = slot(9, 0, 10, 0);
        assert!(a.overlaps(&slot(9, 30, 10, 30)));
        assert!(!a.overlaps(&slot(10, 0, 11, 0)));
    }

    #[test]
    fn test_overlap_minutes() {
        let a = slot(14, 30, 15, 30);
        assert_eq!(a.overlap_minutes(&slot(15, 0, 15, 30)), 30);
        assert_eq!(a.overlap_minutes(&slot(15, 30, 16, 0)), 0);
        assert_eq!(a.overlap_minutes(&slot(14, 0, 16, 0)), 60);
    }

    #[test]
    fn test_week_dates() {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let days = week_dates(monday);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], monday);
        assert_eq!(days[6], NaiveDate::from_ymd_opt(2026, 8, 16).unwrap());
    }
}
