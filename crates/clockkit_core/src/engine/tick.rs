//! Periodic tick sources.
//!
//! The host owns the actual timer (event loop interval, frame callback) and
//! calls the engine's `tick()` when it fires. Engines only start and cancel it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Nominal cadence for the countdown display.
pub const TIMER_TICK_INTERVAL: Duration = Duration::from_millis(1000);
/// Nominal cadence for the stopwatch display.
pub const STOPWATCH_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Periodic callback source controlled by an engine.
pub trait TickSource {
    /// Starts (or restarts) periodic ticks at `interval`.
    fn start(&mut self, interval: Duration);
    /// Stops ticks synchronously; no tick may be delivered after this returns.
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// Observable record of what an engine did with its tick source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickLog {
    pub active: bool,
    pub interval: Option<Duration>,
    pub starts: u32,
    pub cancels: u32,
}

/// Tick source for hosts that poll, and for tests.
///
/// Clones share one log, so a test can keep a clone while the engine owns
/// the original. The log is `Send` so engines holding it can live behind a
/// process-wide lock.
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    log: Arc<Mutex<TickLog>>,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> TickLog {
        self.lock().clone()
    }

    /// Interval the host should poll at, or `None` while stopped.
    pub fn active_interval(&self) -> Option<Duration> {
        let log = self.lock();
        if log.active {
            log.interval
        } else {
            None
        }
    }

    fn lock(&self) -> MutexGuard<'_, TickLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TickSource for ManualTicks {
    fn start(&mut self, interval: Duration) {
        let mut log = self.lock();
        log.active = true;
        log.interval = Some(interval);
        log.starts += 1;
    }

    fn cancel(&mut self) {
        let mut log = self.lock();
        if log.active {
            log.active = false;
            log.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.lock().active
    }
}

#[cfg(test)]
mod tests {
    use super::{ManualTicks, TickSource, TIMER_TICK_INTERVAL};
    use std::thread;

    #[test]
    fn clones_share_the_log_across_threads() {
        let mut ticks = ManualTicks::new();
        let observer = ticks.clone();
        ticks.start(TIMER_TICK_INTERVAL);

        let seen = thread::spawn(move || observer.active_interval())
            .join()
            .expect("observer thread should not panic");
        assert_eq!(seen, Some(TIMER_TICK_INTERVAL));

        ticks.cancel();
        ticks.cancel();
        let log = ticks.log();
        assert_eq!(log.cancels, 1);
        assert_eq!(ticks.active_interval(), None);
    }
}
