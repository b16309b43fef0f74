//! The recurrence-expansion and slot-scheduling engine.
//!
//! The pipeline runs expansion → optimizer proposal → reconciliation:
//! [`recurrence::expand`] derives the week's achievable instances,
//! an [`optimizer::OptimizerStrategy`] proposes start times (advisory only),
//! and [`reconcile::reconcile`] validates the proposals against live
//! availability and deterministically fills every gap, so each instance
//! ends up placed or explicitly in conflict.
//!
//! [`moves`] handles the post-hoc case of relocating one already-scheduled
//! instance.

pub mod availability;
pub mod moves;
pub mod optimizer;
pub mod recurrence;
pub mod reconcile;
pub mod slots;

pub use availability::{blocking_slots_for_day, compute_availability, validate_time_in_slots};
pub use moves::{classify_conflicts, MoveConflictRecord, MoveResolution, SiblingConflict};
pub use optimizer::{
    DayBatch, HeuristicOptimizer, NoopOptimizer, OptimizerBatch, OptimizerStrategy, TimeProposal,
};
pub use recurrence::{expand, Expansion};
pub use reconcile::{reconcile, BlockingContext};
pub use slots::find_slot;
