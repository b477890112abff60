//! Wall-clock sources.

use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Source of the current wall-clock instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Unix epoch milliseconds.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-advanced clock. Clones share one instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    epoch_ms: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn at_epoch_ms(epoch_ms: i64) -> Self {
        Self {
            epoch_ms: Rc::new(Cell::new(epoch_ms)),
        }
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self::at_epoch_ms(instant.timestamp_millis())
    }

    pub fn advance(&self, by: Duration) {
        let delta = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.advance_ms(delta);
    }

    /// Negative values move the clock backwards.
    pub fn advance_ms(&self, delta_ms: i64) {
        self.epoch_ms.set(self.epoch_ms.get().saturating_add(delta_ms));
    }

    pub fn set_epoch_ms(&self, epoch_ms: i64) {
        self.epoch_ms.set(epoch_ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.epoch_ms.get())
            .single()
            .unwrap_or_default()
    }

    fn now_ms(&self) -> i64 {
        self.epoch_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use std::time::Duration;

    #[test]
    fn clones_share_the_same_instant() {
        let clock = ManualClock::at_epoch_ms(1_000);
        let observer = clock.clone();
        clock.advance(Duration::from_millis(1_500));
        assert_eq!(observer.now_ms(), 2_500);
        assert_eq!(observer.now().timestamp_millis(), 2_500);
    }
}
