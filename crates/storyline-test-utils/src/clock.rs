use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use storyline_core::Clock;

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at_ms(ms: i64) -> Self {
        Self {
            now: Mutex::new(DateTime::from_timestamp_millis(ms).unwrap_or_default()),
        }
    }

    pub fn set_ms(&self, ms: i64) {
        *self.now.lock() = DateTime::from_timestamp_millis(ms).unwrap_or_default();
    }

    pub fn advance_ms(&self, ms: i64) {
        *self.now.lock() += TimeDelta::milliseconds(ms);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
