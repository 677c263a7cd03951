//! Clock port for time-related operations

use chrono::{DateTime, Utc};

/// Port for getting the current time.
///
/// System variables read time only through this trait, so tests can drive
/// session time with a fixed or stepping clock. Readings should never go
/// backwards; `system__call_duration_secs` is only as monotonic as the clock.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
