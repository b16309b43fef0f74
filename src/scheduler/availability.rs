//! Availability computation: turning a day's blocking intervals into the
//! ordered list of free slots within the scheduling window.
//!
//! The computation is a pure left-to-right sweep and must be re-run whenever
//! the blocking set changes; callers never mutate a previously returned slot
//! list in place.

use crate::models::blocking::BlockedInterval;
use crate::models::time::TimeSlot;
use chrono::NaiveDate;

/// Compute the ordered free slots for one day.
///
/// Starts from the single interval `[window.start, window.end]`, sorts the
/// blocking intervals that intersect the window by start time, and sweeps
/// left to right emitting every gap of at least `min_gap_minutes`. The
/// cursor only ever moves forward, so overlapping blocks merge implicitly
/// and fully contained blocks are absorbed. Inverted or zero-length blocks
/// never survive `TimeSlot` construction and cannot reach this function.
pub fn compute_availability(
    blocks: &[TimeSlot],
    window: TimeSlot,
    min_gap_minutes: i64,
) -> Vec<TimeSlot> {
    let mut relevant: Vec<&TimeSlot> = blocks.iter().filter(|b| b.overlaps(&window)).collect();
    relevant.sort_by_key(|b| b.start);

    let mut free = Vec::new();
    let mut cursor = window.start;

    for block in relevant {
        if block.start > cursor {
            if let Some(gap) = TimeSlot::new(cursor, block.start.min(window.end)) {
                if gap.duration_minutes() >= min_gap_minutes {
                    free.push(gap);
                }
            }
        }
        cursor = cursor.max(block.end);
        if cursor >= window.end {
            return free;
        }
    }

    if let Some(tail) = TimeSlot::new(cursor, window.end) {
        if tail.duration_minutes() >= min_gap_minutes {
            free.push(tail);
        }
    }
    free
}

/// Collect the blocking slots relevant for `date` from a mixed interval set.
///
/// Whole-day kinds (vacation, holiday) are widened to the full window so a
/// single marker interval removes the day entirely.
pub fn blocking_slots_for_day(
    blocked: &[BlockedInterval],
    date: NaiveDate,
    window: TimeSlot,
) -> Vec<TimeSlot> {
    blocked
        .iter()
        .filter(|b| b.date == date)
        .map(|b| if b.kind.blocks_whole_day() { window } else { b.slot })
        .collect()
}

/// Check that a proposed slot is wholly contained in one free slot.
pub fn validate_time_in_slots(availability: &[TimeSlot], proposed: &TimeSlot) -> bool {
    availability.iter().any(|slot| slot.contains_slot(proposed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::blocking::BlockKind;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(sh: u32, sm: u32, eh: u32, em: u32) -> TimeSlot {
        TimeSlot::new(t(sh, sm), t(eh, em)).unwrap()
    }

    fn window() -> TimeSlot {
        slot(8, 0, 17, 0)
    }

    #[test]
    fn single_block_produces_two_free_slots() {
        let free = compute_availability(&[slot(10, 0, 11, 0)], window(), 15);
        assert_eq!(free, vec![slot(8, 0, 10, 0), slot(11, 0, 17, 0)]);
        assert_eq!(free[0].duration_minutes(), 120);
        assert_eq!(free[1].duration_minutes(), 360);
    }

    #[test]
    fn no_blocks_entire_window_is_free() {
        let free = compute_availability(&[], window(), 15);
        assert_eq!(free, vec![window()]);
    }

    #[test]
    fn overlapping_blocks_merge() {
        // 10:00-11:30 and 11:00-12:00 merge into one busy stretch.
        let free = compute_availability(&[slot(10, 0, 11, 30), slot(11, 0, 12, 0)], window(), 15);
        assert_eq!(free, vec![slot(8, 0, 10, 0), slot(12, 0, 17, 0)]);
    }

    #[test]
    fn contained_block_is_absorbed() {
        let free = compute_availability(&[slot(9, 0, 12, 0), slot(10, 0, 11, 0)], window(), 15);
        assert_eq!(free, vec![slot(8, 0, 9, 0), slot(12, 0, 17, 0)]);
    }

    #[test]
    fn blocks_filling_window_leave_nothing() {
        let free = compute_availability(&[slot(8, 0, 17, 0)], window(), 15);
        assert!(free.is_empty());
    }

    #[test]
    fn sub_granularity_gaps_are_dropped() {
        // 10-minute gap between the blocks is below the 15-minute floor.
        let free = compute_availability(&[slot(8, 0, 10, 0), slot(10, 10, 17, 0)], window(), 15);
        assert!(free.is_empty());
    }

    #[test]
    fn blocks_outside_window_are_ignored() {
        let free = compute_availability(&[slot(6, 0, 7, 0), slot(17, 30, 18, 0)], window(), 15);
        assert_eq!(free, vec![window()]);
    }

    #[test]
    fn block_straddling_window_start_is_clipped() {
        let free = compute_availability(&[slot(7, 0, 9, 0)], window(), 15);
        assert_eq!(free, vec![slot(9, 0, 17, 0)]);
    }

    #[test]
    fn whole_day_kind_widens_to_window() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 12).unwrap();
        let marker = BlockedInterval::new(date, slot(0, 0, 0, 15), "Holiday", BlockKind::Holiday);
        let slots = blocking_slots_for_day(&[marker], date, window());
        assert_eq!(slots, vec![window()]);
        assert!(compute_availability(&slots, window(), 15).is_empty());
    }

    #[test]
    fn other_days_blocks_are_filtered_out() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 12).unwrap();
        let other = NaiveDate::from_ymd_opt(2026, 8, 13).unwrap();
        let block = BlockedInterval::new(other, slot(9, 0, 10, 0), "Dentist", BlockKind::CalendarEvent);
        assert!(blocking_slots_for_day(&[block], date, window()).is_empty());
    }

    #[test]
    fn validate_time_in_slots_requires_single_slot_containment() {
        let availability = vec![slot(8, 0, 10, 0), slot(11, 0, 17, 0)];
        assert!(validate_time_in_slots(&availability, &slot(8, 30, 9, 30)));
        // Spans the busy stretch between the two free slots.
        assert!(!validate_time_in_slots(&availability, &slot(9, 30, 11, 30)));
        assert!(!validate_time_in_slots(&availability, &slot(16, 30, 17, 30)));
    }
}
