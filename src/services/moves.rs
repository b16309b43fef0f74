//! Moving an already-scheduled instance, with conflict preview and
//! transactional commit.

use crate::api::InstanceId;
use crate::config::SchedulerConfig;
use crate::db::repository::FullRepository;
use crate::models::instance::ScheduledInstance;
use crate::models::time::TimeSlot;
use crate::scheduler::moves::{
    classify_conflicts, MoveConflictRecord, MoveResolution, SiblingConflict,
};
use crate::services::error::{SchedulingError, ServiceResult};
use chrono::{DateTime, NaiveTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to move one scheduled instance to a new time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveInstanceRequest {
    pub instance_id: InstanceId,
    pub new_start: NaiveTime,
    pub new_end: NaiveTime,
    /// Set after the caller has reviewed the conflict preview.
    #[serde(default)]
    pub confirmed: bool,
}

/// Result of a move request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Conflicts were found and the caller has not confirmed; nothing was
    /// committed.
    RequiresConfirmation { conflicts: Vec<SiblingConflict> },
    /// The move was committed.
    Applied {
        instance: ScheduledInstance,
        conflicts_resolved: usize,
    },
}

/// Move a scheduled instance, resolving same-day collisions.
///
/// Overlapping siblings are classified as shortened (trimmed automatically)
/// or displaced (flagged for the user). With conflicts present and no
/// confirmation, the preview is returned without committing. A confirmed
/// (or clean) move commits the instance, the trimmed siblings, the
/// displaced flags, and one audit record per affected sibling plus one for
/// the moved instance itself, atomically.
pub async fn move_instance(
    repo: &dyn FullRepository,
    cfg: &SchedulerConfig,
    request: MoveInstanceRequest,
    now: DateTime<Utc>,
) -> ServiceResult<MoveOutcome> {
    let instance = repo.get_instance(request.instance_id).await?;
    let new_slot = TimeSlot::new(request.new_start, request.new_end).ok_or_else(|| {
        SchedulingError::InvalidRequest("new start must precede new end".to_string())
    })?;

    let siblings: Vec<ScheduledInstance> = repo
        .instances_in_range(instance.user_id, instance.date, instance.date)
        .await?
        .into_iter()
        .filter(|s| s.id != instance.id)
        .collect();

    let conflicts = classify_conflicts(new_slot, &siblings, cfg.displacement_threshold);
    if !conflicts.is_empty() && !request.confirmed {
        return Ok(MoveOutcome::RequiresConfirmation { conflicts });
    }

    let mut moved = instance.clone();
    // First move records where the instance was originally scheduled;
    // later moves keep that provenance.
    if moved.original_slot.is_none() {
        moved.original_slot = Some(instance.slot);
    }
    moved.slot = new_slot;

    let mut shortened = Vec::new();
    let mut displaced = Vec::new();
    let mut records = Vec::new();
    for conflict in &conflicts {
        match conflict.resolution {
            MoveResolution::Shortened => {
                if let Some(trimmed) = conflict.proposed_slot {
                    if let Some(sibling) =
                        siblings.iter().find(|s| s.id == Some(conflict.sibling_id))
                    {
                        let mut updated = sibling.clone();
                        updated.slot = trimmed;
                        shortened.push(updated);
                    }
                }
            }
            MoveResolution::Displaced => displaced.push(conflict.sibling_id),
            MoveResolution::Clean => {}
        }
        records.push(MoveConflictRecord {
            id: Uuid::new_v4(),
            user_id: instance.user_id,
            moved_instance_id: request.instance_id,
            affected_instance_id: Some(conflict.sibling_id),
            affected_name: Some(conflict.sibling_name.clone()),
            date: instance.date,
            original_slot: conflict.original_slot,
            new_slot: conflict.proposed_slot.unwrap_or(conflict.original_slot),
            resolution: conflict.resolution,
            accepted: true,
            created_at: now,
        });
    }
    // Audit the move itself even when nothing collided.
    records.push(MoveConflictRecord {
        id: Uuid::new_v4(),
        user_id: instance.user_id,
        moved_instance_id: request.instance_id,
        affected_instance_id: None,
        affected_name: None,
        date: instance.date,
        original_slot: instance.slot,
        new_slot,
        resolution: MoveResolution::Clean,
        accepted: true,
        created_at: now,
    });

    let conflicts_resolved = conflicts.len();
    let applied = repo
        .commit_move(moved, shortened, displaced, records)
        .await?;
    info!(
        "move_instance id={} -> {} ({} conflict(s) resolved)",
        request.instance_id, new_slot, conflicts_resolved
    );
    Ok(MoveOutcome::Applied {
        instance: applied,
        conflicts_resolved,
    })
}
