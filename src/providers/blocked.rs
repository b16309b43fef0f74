//! Blocked-time provider seam: work hours, commute, vacations, holidays.

use crate::api::UserId;
use crate::models::blocking::BlockedInterval;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

/// Source of non-calendar blocking intervals for a user and date range,
/// derived from work-schedule configuration and holiday calendars.
#[async_trait]
pub trait BlockedTimeProvider: Send + Sync {
    async fn blocked_intervals(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<BlockedInterval>>;
}

/// In-memory provider for tests and local development.
#[derive(Debug, Default)]
pub struct StaticBlockedTimeProvider {
    intervals: RwLock<Vec<(UserId, BlockedInterval)>>,
}

impl StaticBlockedTimeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_interval(&self, user_id: UserId, interval: BlockedInterval) {
        self.intervals.write().push((user_id, interval));
    }
}

#[async_trait]
impl BlockedTimeProvider for StaticBlockedTimeProvider {
    async fn blocked_intervals(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<BlockedInterval>> {
        Ok(self
            .intervals
            .read()
            .iter()
            .filter(|(owner, interval)| {
                *owner == user_id && interval.date >= from && interval.date <= to
            })
            .map(|(_, interval)| interval.clone())
            .collect())
    }
}
