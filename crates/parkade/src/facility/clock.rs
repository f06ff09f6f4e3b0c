use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Time source used to stamp tickets and price departures.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock. Clones share the same instant, so a test can keep one
/// handle while the lot owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    instant: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn starting_at(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(Mutex::new(instant)),
        }
    }

    /// Moves the clock forward (or back, for a negative `by`) and returns the
    /// new instant. The clock is left untouched when the result would fall
    /// outside the representable range.
    pub fn advance(&self, by: Duration) -> Result<DateTime<Utc>, ClockOverflow> {
        let mut guard = self.instant.lock().expect("clock mutex poisoned");
        let next = guard
            .checked_add_signed(by)
            .ok_or(ClockOverflow { from: *guard, by })?;
        *guard = next;
        Ok(next)
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().expect("clock mutex poisoned") = instant;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("advancing the clock from {from} by {by} leaves the supported time range")]
pub struct ClockOverflow {
    pub from: DateTime<Utc>,
    pub by: Duration,
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().expect("clock mutex poisoned")
    }
}
