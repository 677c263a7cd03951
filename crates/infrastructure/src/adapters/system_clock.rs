//! System clock adapter

use std::time::Instant;

use chrono::{DateTime, Utc};
use dynvar_application::ports::Clock;

/// Wall clock backing the system variables of live sessions.
///
/// Reads the wall clock once at construction and advances it with a monotonic
/// [`Instant`], so readings never go backwards when the host clock is stepped.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    anchor: DateTime<Utc>,
    started: Instant,
}

impl SystemClock {
    /// Creates a new system clock anchored at the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            anchor: Utc::now(),
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        chrono::Duration::from_std(self.started.elapsed())
            .ok()
            .and_then(|elapsed| self.anchor.checked_add_signed(elapsed))
            .unwrap_or(self.anchor)
    }
}
