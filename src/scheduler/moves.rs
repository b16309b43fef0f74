//! Move-conflict resolution: classifying the effect of moving one scheduled
//! instance onto its same-day siblings.

use crate::api::{InstanceId, UserId};
use crate::models::instance::ScheduledInstance;
use crate::models::time::TimeSlot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overlap fraction of a sibling's duration at or above which the sibling is
/// displaced rather than shortened. The boundary itself displaces.
pub const DISPLACEMENT_THRESHOLD: f64 = 0.5;

/// Outcome class for an instance touched by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveResolution {
    /// The move itself, when it collided with nothing
    Clean,
    /// Minor overlap; the sibling's boundary was trimmed automatically
    Shortened,
    /// Major overlap; the sibling is flagged for the user to handle
    Displaced,
}

/// One sibling affected by a proposed move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiblingConflict {
    pub sibling_id: InstanceId,
    pub sibling_name: String,
    pub resolution: MoveResolution,
    /// The sibling's current times
    pub original_slot: TimeSlot,
    /// The trimmed times, present only for shortened siblings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_slot: Option<TimeSlot>,
}

/// Auditable record of one manual move, written even for clean moves.
/// Append-only; never deleted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveConflictRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub moved_instance_id: InstanceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_instance_id: Option<InstanceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_name: Option<String>,
    pub date: NaiveDate,
    pub original_slot: TimeSlot,
    pub new_slot: TimeSlot,
    pub resolution: MoveResolution,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

/// Classify the effect of moving an instance to `new_slot` on its same-day,
/// non-skipped siblings.
///
/// The overlapping duration is measured as a fraction of the sibling's own
/// duration. Below `threshold` the sibling is shortened: when the moved
/// instance starts at or before it, its start is pushed to the moved end and
/// its length becomes the un-overlapped remainder; otherwise its end is
/// trimmed to the moved start. At or above `threshold` the sibling is
/// displaced and keeps its times.
pub fn classify_conflicts(
    new_slot: TimeSlot,
    siblings: &[ScheduledInstance],
    threshold: f64,
) -> Vec<SiblingConflict> {
    let mut conflicts = Vec::new();
    for sibling in siblings.iter().filter(|s| s.is_blocking()) {
        let Some(sibling_id) = sibling.id else {
            continue;
        };
        let overlap = new_slot.overlap_minutes(&sibling.slot);
        if overlap == 0 {
            continue;
        }
        let fraction = overlap as f64 / sibling.slot.duration_minutes() as f64;
        let (resolution, proposed_slot) = if fraction < threshold {
            match shorten(&sibling.slot, &new_slot, overlap) {
                Some(trimmed) => (MoveResolution::Shortened, Some(trimmed)),
                // A trim that cannot be expressed within the day falls back
                // to flagging the sibling.
                None => (MoveResolution::Displaced, None),
            }
        } else {
            (MoveResolution::Displaced, None)
        };
        conflicts.push(SiblingConflict {
            sibling_id,
            sibling_name: sibling.task_name.clone(),
            resolution,
            original_slot: sibling.slot,
            proposed_slot,
        });
    }
    conflicts
}

fn shorten(sibling: &TimeSlot, moved: &TimeSlot, overlap_minutes: i64) -> Option<TimeSlot> {
    if moved.start <= sibling.start {
        let kept = sibling.duration_minutes() - overlap_minutes;
        TimeSlot::from_start_duration(moved.end, kept)
    } else {
        TimeSlot::new(sibling.start, moved.start)
    }
}
