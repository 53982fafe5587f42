//! Deterministic clock for tests.

use bookflow_core::environment::Clock;
use chrono::{DateTime, TimeZone, Utc};

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock pinned to the given instant.
    #[must_use]
    pub const fn at(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// A fixed clock at an arbitrary but stable instant.
///
/// # Panics
///
/// Never panics; the embedded timestamp is valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::at(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
}
