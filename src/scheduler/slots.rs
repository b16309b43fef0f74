//! Slot finding: choosing the single best free slot for one instance's
//! constraint set, or reporting that none fits.

use crate::models::time::TimeSlot;
use chrono::NaiveTime;

/// Find a start/end pair for an instance against a day's availability.
///
/// Policy, in priority order:
/// 1. A fixed time is honored exactly or not at all; no substitution.
/// 2. With a preferred window, the first free slot whose start lies inside
///    the window and has room wins.
/// 3. Otherwise the first free slot with room wins.
///
/// A task is always placed in one contiguous free interval; slots are never
/// split across gaps.
pub fn find_slot(
    availability: &[TimeSlot],
    duration_minutes: i64,
    fixed_time: Option<NaiveTime>,
    preferred_window: Option<TimeSlot>,
) -> Option<TimeSlot> {
    if let Some(at) = fixed_time {
        let wanted = TimeSlot::from_start_duration(at, duration_minutes)?;
        return availability
            .iter()
            .any(|slot| slot.contains_slot(&wanted))
            .then_some(wanted);
    }

    if let Some(window) = preferred_window {
        if let Some(found) = availability.iter().find_map(|slot| {
            if !window.contains_time(slot.start) {
                return None;
            }
            fit_at_start(slot, duration_minutes)
        }) {
            return Some(found);
        }
        // A slot opening before the window can still host the task at the
        // window's start when enough of it lies inside.
        if let Some(found) = availability.iter().find_map(|slot| {
            if slot.start >= window.start || !slot.contains_time(window.start) {
                return None;
            }
            let candidate = TimeSlot::from_start_duration(window.start, duration_minutes)?;
            slot.contains_slot(&candidate).then_some(candidate)
        }) {
            return Some(found);
        }
    }

    availability
        .iter()
        .find_map(|slot| fit_at_start(slot, duration_minutes))
}

fn fit_at_start(slot: &TimeSlot, duration_minutes: i64) -> Option<TimeSlot> {
    if slot.duration_minutes() < duration_minutes {
        return None;
    }
    TimeSlot::from_start_duration(slot.start, duration_minutes)
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
    fn fixed_time_is_exact_or_nothing() {
        let availability = vec![slot(8, 0, 12, 0)];
        let found = find_slot(&availability, 30, Some(t(9, 0)), None).unwrap();
        assert_eq!(found, slot(9, 0, 9, 30));

        // 11:45 + 30min spills past the free slot: no substitution.
        assert!(find_slot(&availability, 30, Some(t(11, 45)), None).is_none());
        // A fixed time inside a busy stretch fails outright.
        let availability = vec![slot(8, 0, 9, 0), slot(9, 30, 12, 0)];
        assert!(find_slot(&availability, 30, Some(t(9, 0)), None).is_none());
    }

    #[test]
    fn preferred_window_takes_first_matching_start() {
        let availability = vec![slot(6, 30, 7, 0), slot(7, 30, 10, 0)];
        let window = slot(7, 0, 9, 0);
        let found = find_slot(&availability, 45, None, Some(window)).unwrap();
        // 06:30 slot starts before the window and is too small anyway;
        // 07:30 starts inside it.
        assert_eq!(found, slot(7, 30, 8, 15));
    }

    #[test]
    fn wide_slot_spanning_window_start_is_used_at_window_start() {
        let availability = vec![slot(5, 0, 12, 0)];
        let window = slot(6, 0, 9, 0);
        let found = find_slot(&availability, 45, None, Some(window)).unwrap();
        assert_eq!(found, slot(6, 0, 6, 45));
    }

    #[test]
    fn preferred_window_falls_back_to_first_fit() {
        // Nothing starts inside or spans the evening window; first fit wins.
        let availability = vec![slot(8, 0, 10, 0)];
        let window = slot(18, 0, 21, 0);
        let found = find_slot(&availability, 60, None, Some(window)).unwrap();
        assert_eq!(found, slot(8, 0, 9, 0));
    }

    #[test]
    fn unconstrained_takes_first_sufficient_slot() {
        let availability = vec![slot(8, 0, 8, 30), slot(10, 0, 12, 0)];
        let found = find_slot(&availability, 60, None, None).unwrap();
        assert_eq!(found, slot(10, 0, 11, 0));
    }

    #[test]
    fn no_fit_returns_none() {
        let availability = vec![slot(8, 0, 8, 30)];
        assert!(find_slot(&availability, 60, None, None).is_none());
        assert!(find_slot(&[], 15, None, None).is_none());
    }
}
