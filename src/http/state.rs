//! Application state for the HTTP server.

use crate::config::SchedulerConfig;
use crate::db::repository::FullRepository;
use crate::providers::{BlockedTimeProvider, CalendarProvider};
use crate::scheduler::optimizer::OptimizerStrategy;
use std::sync::Arc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Calendar events collaborator
    pub calendar: Arc<dyn CalendarProvider>,
    /// Blocked-time collaborator
    pub blocked_time: Arc<dyn BlockedTimeProvider>,
    /// Advisory optimizer strategy
    pub optimizer: Arc<dyn OptimizerStrategy>,
    /// Engine tuning knobs
    pub config: Arc<SchedulerConfig>,
}

impl AppState {
    /// Create a new application state with the given collaborators.
    pub fn new(
        repository: Arc<dyn FullRepository>,
        calendar: Arc<dyn CalendarProvider>,
        blocked_time: Arc<dyn BlockedTimeProvider>,
        optimizer: Arc<dyn OptimizerStrategy>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            repository,
            calendar,
            blocked_time,
            optimizer,
            config: Arc::new(config),
        }
    }
}
