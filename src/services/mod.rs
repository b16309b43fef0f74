//! Service layer for business logic and orchestration.
//!
//! Services sit between the repository/provider seams and the HTTP
//! handlers: they run the scheduling pipeline, enforce transactional commit
//! boundaries, and map engine outcomes into response shapes.

pub mod error;

pub mod generate;

pub mod moves;

pub mod quick;

pub use error::{SchedulingError, ServiceResult};
pub use generate::{generate_schedule, GenerateScheduleResponse, Placement, ScheduleConflict};
pub use moves::{move_instance, MoveInstanceRequest, MoveOutcome};
pub use quick::{quick_schedule, QuickScheduleRequest};
