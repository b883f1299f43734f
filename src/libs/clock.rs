//! Injectable time source for every time-entry computation.
//!
//! The engine never reads the system clock on its own. Each entry point asks
//! the [`Clock`] it was constructed with, so tests can drive time
//! deterministically with [`FakeClock`] while production uses [`SystemClock`].
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use shopclock::libs::clock::{Clock, FakeClock};
//!
//! let clock = FakeClock::new(Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).unwrap());
//! let handle = clock.clone();
//! handle.advance_hours(4);
//! assert_eq!(clock.now(), Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap());
//! ```

use chrono::{DateTime, Duration, SubsecRound, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to the millisecond precision the database keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

/// Settable clock for tests.
///
/// Clones share the same instant, so a test can keep a handle and advance
/// the clock that a `TimeClock` owns.
#[derive(Debug, Clone)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, time: DateTime<Utc>) {
        *self.current.lock() = time;
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }

    pub fn advance_millis(&self, millis: i64) {
        self.advance(Duration::milliseconds(millis));
    }

    pub fn advance_seconds(&self, seconds: i64) {
        self.advance(Duration::seconds(seconds));
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(Duration::minutes(minutes));
    }

    pub fn advance_hours(&self, hours: i64) {
        self.advance(Duration::hours(hours));
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fake_clock_clones_share_time() {
        let start = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
        let clock = FakeClock::new(start);
        let handle = clock.clone();

        handle.advance_minutes(90);
        handle.advance_seconds(30);
        handle.advance_millis(250);

        let expected = start + Duration::minutes(90) + Duration::seconds(30) + Duration::milliseconds(250);
        assert_eq!(clock.now(), expected);

        clock.set(start);
        assert_eq!(handle.now(), start);
    }

    #[test]
    fn system_clock_has_millisecond_precision() {
        let now = SystemClock.now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
