//! Calendar events provider seam.

use crate::api::UserId;
use crate::models::blocking::{BlockKind, BlockedInterval};
use crate::models::time::TimeSlot;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One event as returned by an external calendar integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CalendarEvent {
    /// The portion of this event that blocks `date`, clipped to the
    /// scheduling window. `None` when the event does not touch the date or
    /// lies entirely outside the window.
    pub fn blocking_slot(&self, date: NaiveDate, window: TimeSlot) -> Option<TimeSlot> {
        if self.end <= self.start {
            return None;
        }
        let day_start = date.and_time(window.start);
        let day_end = date.and_time(window.end);
        let start = self.start.max(day_start);
        let end = self.end.min(day_end);
        if start >= end {
            return None;
        }
        TimeSlot::new(start.time(), end.time())
    }

    /// Blocking intervals for every date of the week this event touches.
    pub fn blocked_intervals(&self, dates: &[NaiveDate], window: TimeSlot) -> Vec<BlockedInterval> {
        dates
            .iter()
            .filter_map(|date| {
                self.blocking_slot(*date, window).map(|slot| {
                    BlockedInterval::new(*date, slot, self.summary.clone(), BlockKind::CalendarEvent)
                })
            })
            .collect()
    }
}

/// Source of calendar events for a user and date range.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn events_in_range(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<CalendarEvent>>;
}

/// In-memory provider for tests and local development.
#[derive(Debug, Default)]
pub struct StaticCalendarProvider {
    events: RwLock<Vec<(UserId, CalendarEvent)>>,
}

impl StaticCalendarProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<(UserId, CalendarEvent)>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    pub fn add_event(&self, user_id: UserId, event: CalendarEvent) {
        self.events.write().push((user_id, event));
    }
}

#[async_trait]
impl CalendarProvider for StaticCalendarProvider {
    async fn events_in_range(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<CalendarEvent>> {
        Ok(self
            .events
            .read()
            .iter()
            .filter(|(owner, event)| {
                *owner == user_id
                    && event.start.date() <= to
                    && event.end.date() >= from
            })
            .map(|(_, event)| event.clone())
            .collect())
    }
}

/// Wrapper memoizing range fetches in an explicit, run-scoped cache.
///
/// The cache object is passed in rather than held as module state, so its
/// lifetime is decided by the caller (one run, or one process for the
/// default server wiring).
pub struct CachingCalendarProvider<P> {
    inner: P,
    cache: Arc<ProviderCacheHandle>,
}

type ProviderCacheHandle = super::cache::ProviderCache<(UserId, NaiveDate, NaiveDate), Vec<CalendarEvent>>;

impl<P: CalendarProvider> CachingCalendarProvider<P> {
    pub fn new(inner: P, cache: Arc<ProviderCacheHandle>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<P: CalendarProvider> CalendarProvider for CachingCalendarProvider<P> {
    async fn events_in_range(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<CalendarEvent>> {
        let key = (user_id, from, to);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let events = self.inner.events_in_range(user_id, from, to).await?;
        self.cache.put(key, events.clone());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn window() -> TimeSlot {
        TimeSlot::new(t(6, 0), t(22, 0)).unwrap()
    }

    fn event(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            summary: format!("event {}", id),
            start,
            end,
        }
    }

    #[test]
    fn blocking_slot_clips_to_window() {
        let e = event("1", d(10).and_time(t(5, 0)), d(10).and_time(t(7, 0)));
        assert_eq!(
            e.blocking_slot(d(10), window()),
            TimeSlot::new(t(6, 0), t(7, 0))
        );
        assert_eq!(e.blocking_slot(d(11), window()), None);
    }

    #[test]
    fn inverted_event_is_ignored() {
        let e = event("1", d(10).and_time(t(9, 0)), d(10).and_time(t(8, 0)));
        assert_eq!(e.blocking_slot(d(10), window()), None);
    }

    #[test]
    fn multi_day_event_blocks_each_day() {
        let e = event("1", d(10).and_time(t(20, 0)), d(12).and_time(t(8, 0)));
        let dates: Vec<_> = (10..=12).map(d).collect();
        let blocks = e.blocked_intervals(&dates, window());
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].slot, TimeSlot::new(t(20, 0), t(22, 0)).unwrap());
        assert_eq!(blocks[1].slot, window());
        assert_eq!(blocks[2].slot, TimeSlot::new(t(6, 0), t(8, 0)).unwrap());
    }

    #[tokio::test]
    async fn static_provider_filters_by_user_and_range() {
        let provider = StaticCalendarProvider::new();
        provider.add_event(
            UserId::new(1),
            event("a", d(10).and_time(t(9, 0)), d(10).and_time(t(10, 0))),
        );
        provider.add_event(
            UserId::new(2),
            event("b", d(10).and_time(t(9, 0)), d(10).and_time(t(10, 0))),
        );

        let events = provider
            .events_in_range(UserId::new(1), d(10), d(16))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "a");
    }

    #[tokio::test]
    async fn caching_provider_serves_repeat_fetches_from_cache() {
        let provider = StaticCalendarProvider::new();
        provider.add_event(
            UserId::new(1),
            event("a", d(10).and_time(t(9, 0)), d(10).and_time(t(10, 0))),
        );
        let cache = Arc::new(super::super::cache::ProviderCache::new());
        let caching = CachingCalendarProvider::new(provider, cache.clone());

        let first = caching
            .events_in_range(UserId::new(1), d(10), d(16))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(cache.len(), 1);

        // The same range comes back from the cache.
        let second = caching
            .events_in_range(UserId::new(1), d(10), d(16))
            .await
            .unwrap();
        assert_eq!(second, first);
    }
}
