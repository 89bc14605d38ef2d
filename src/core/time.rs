//! Clock abstraction for testable time-dependent logic
//!
//! Note timestamps are wall-clock local date-times (they round-trip through
//! the ISO-8601 CSV format), so the abstraction deals in `NaiveDateTime`.

use chrono::NaiveDateTime;
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Abstraction over wall-clock time for timestamping notes
pub trait Clock: Send + Sync {
    /// Current local date-time
    fn now(&self) -> NaiveDateTime;
}

/// Production clock using the actual system time
#[derive(Debug, Default, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Fixed clock for deterministic testing
#[cfg(test)]
#[derive(Clone)]
pub struct FixedClock {
    current: Arc<Mutex<NaiveDateTime>>,
}

#[cfg(test)]
impl FixedClock {
    pub fn at(current: NaiveDateTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(current)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: chrono::Duration) {
        let mut current = self.current.lock().unwrap();
        *current += duration;
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.lock().unwrap()
    }
}
