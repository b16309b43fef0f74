//! Validation and gap-filling: the pass that turns advisory proposals into
//! a total set of placements and explicit conflicts.

use crate::models::blocking::BlockedInterval;
use crate::models::instance::{InstanceOutcome, TaskInstance};
use crate::models::time::TimeSlot;
use crate::scheduler::availability::{
    blocking_slots_for_day, compute_availability, validate_time_in_slots,
};
use crate::scheduler::optimizer::TimeProposal;
use crate::scheduler::slots::find_slot;
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::HashMap;

/// Per-run blocking state.
///
/// Holds the immutable blocking snapshot taken at the start of the run plus
/// the placements accepted so far. Availability is always recomputed as a
/// pure function of both sets; previously returned slot lists are never
/// mutated.
#[derive(Debug, Clone)]
pub struct BlockingContext {
    window: TimeSlot,
    min_gap_minutes: i64,
    base: Vec<BlockedInterval>,
    accepted: HashMap<NaiveDate, Vec<TimeSlot>>,
}

impl BlockingContext {
    pub fn new(blocked: Vec<BlockedInterval>, window: TimeSlot, min_gap_minutes: i64) -> Self {
        Self {
            window,
            min_gap_minutes,
            base: blocked,
            accepted: HashMap::new(),
        }
    }

    /// Fresh availability for a date, reflecting every accepted placement.
    pub fn availability_for(&self, date: NaiveDate) -> Vec<TimeSlot> {
        let mut blocks = blocking_slots_for_day(&self.base, date, self.window);
        if let Some(placed) = self.accepted.get(&date) {
            blocks.extend_from_slice(placed);
        }
        compute_availability(&blocks, self.window, self.min_gap_minutes)
    }

    /// Record an accepted placement so it blocks later ones on the same day.
    pub fn accept(&mut self, date: NaiveDate, slot: TimeSlot) {
        self.accepted.entry(date).or_default().push(slot);
    }
}

/// Reconcile advisory proposals with reality and fill every gap.
///
/// Pass 1 accepts each proposal that still fits live availability (earlier
/// acceptances on a day block later ones). Pass 2 deterministically places
/// every remaining instance with the slot finder or emits a named-constraint
/// conflict. Every input instance appears exactly once in the output.
pub fn reconcile(
    proposals: &HashMap<String, TimeProposal>,
    instances: Vec<TaskInstance>,
    ctx: &mut BlockingContext,
) -> Vec<InstanceOutcome> {
    let mut ordered = instances;
    // Documented tie-break order: day first, fixed-time instances before
    // flexible ones, then priority (lower wins), task id, ordinal.
    ordered.sort_by_key(|i| {
        (
            i.date,
            i.fixed_time.is_none(),
            i.priority,
            i.task_id,
            i.ordinal,
        )
    });

    let mut outcomes: Vec<Option<InstanceOutcome>> = vec![None; ordered.len()];

    // Pass 1: validate proposals against live availability.
    for (idx, instance) in ordered.iter().enumerate() {
        let Some(proposal) = proposals.get(&instance.batch_key()) else {
            continue;
        };
        let Some(wanted) = TimeSlot::from_start_duration(proposal.start, instance.duration_minutes)
        else {
            warn!(
                "proposal for {} has malformed start {}; ignoring",
                instance.batch_key(),
                proposal.start
            );
            continue;
        };
        let availability = ctx.availability_for(instance.date);
        if !validate_time_in_slots(&availability, &wanted) {
            debug!(
                "proposal for {} at {} no longer fits; deferring to gap-filler",
                instance.batch_key(),
                wanted
            );
            continue;
        }
        ctx.accept(instance.date, wanted);
        let reasoning = if proposal.justification.trim().is_empty() {
            placed_reasoning(instance, &wanted)
        } else {
            proposal.justification.clone()
        };
        outcomes[idx] = Some(InstanceOutcome::Placed {
            instance: instance.clone(),
            slot: wanted,
            reasoning,
        });
    }

    // Pass 2: deterministic fill for everything unresolved.
    for (idx, instance) in ordered.iter().enumerate() {
        if outcomes[idx].is_some() {
            continue;
        }
        let availability = ctx.availability_for(instance.date);
        match find_slot(
            &availability,
            instance.duration_minutes,
            instance.fixed_time,
            instance.preferred_window,
        ) {
            Some(slot) => {
                ctx.accept(instance.date, slot);
                outcomes[idx] = Some(InstanceOutcome::Placed {
                    instance: instance.clone(),
                    slot,
                    reasoning: placed_reasoning(instance, &slot),
                });
            }
            None => {
                outcomes[idx] = Some(conflict_outcome(instance));
            }
        }
    }

    outcomes
        .into_iter()
        .map(|outcome| outcome.expect("both passes visit every instance"))
        .collect()
}

fn placed_reasoning(instance: &TaskInstance, slot: &TimeSlot) -> String {
    if instance.fixed_time.is_some() {
        format!(
            "scheduled at your fixed time of {}",
            slot.start.format("%H:%M")
        )
    } else {
        format!("session {} of {} this week", instance.ordinal, instance.total)
    }
}

fn conflict_outcome(instance: &TaskInstance) -> InstanceOutcome {
    let reason = match instance.fixed_time {
        Some(at) => format!(
            "fixed time {} is not free on {}",
            at.format("%H:%M"),
            instance.date
        ),
        None => format!(
            "no free slot of {} minutes on {}",
            instance.duration_minutes, instance.date
        ),
    };
    InstanceOutcome::Conflict {
        instance: instance.clone(),
        reason,
        alternatives: vec![
            "try a different day".to_string(),
            "reduce the duration".to_string(),
        ],
    }
}
