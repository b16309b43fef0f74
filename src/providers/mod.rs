//! External collaborator seams: calendar events and blocked time.
//!
//! The engine consumes these through traits so the surrounding service can
//! wire real integrations (third-party calendar sync, work-schedule
//! configuration) without the core depending on any of them. The in-memory
//! implementations back tests and the default server wiring.

pub mod blocked;
pub mod cache;
pub mod calendar;

pub use blocked::{BlockedTimeProvider, StaticBlockedTimeProvider};
pub use cache::ProviderCache;
pub use calendar::{CachingCalendarProvider, CalendarEvent, CalendarProvider, StaticCalendarProvider};
