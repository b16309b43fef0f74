//! Service-level error taxonomy.

use crate::db::repository::RepositoryError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, SchedulingError>;

/// Errors surfaced by the scheduling services.
///
/// Optimizer failures never appear here: the generator degrades them to
/// zero proposals and the run still succeeds.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    /// Storage failure; transactional batches were rolled back.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The request itself was malformed (inverted interval, wrong user).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A required collaborator (calendar, blocked-time) failed or timed out.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// A quick placement overlapped existing commitments and the caller did
    /// not allow recording the overlap.
    #[error("Requested time overlaps existing commitments: {0}")]
    OverlapRejected(String),
}

impl SchedulingError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SchedulingError::Repository(RepositoryError::NotFound { .. })
        )
    }
}
