//! Sound/vibration output as an owned, scoped resource.
//!
//! # Invariants
//! - At most one alert plays per handle; ringing again stops the previous one.
//! - A ringing handle is stopped on `stop()`, on re-ring, and on drop.

use log::{error, info};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Vibrate/pause pattern in milliseconds, repeated every 5 s while an alarm rings.
pub const ALARM_VIBRATION_PATTERN_MS: [u64; 8] = [0, 800, 400, 800, 400, 800, 400, 800];
/// Vibrate/pause pattern in milliseconds played once when a timer finishes.
pub const TIMER_VIBRATION_PATTERN_MS: [u64; 6] = [0, 600, 300, 600, 300, 600];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Looping tone with repeating vibration.
    Alarm,
    /// Single tone with one vibration pattern.
    Timer,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alarm => "alarm",
            Self::Timer => "timer",
        }
    }

    pub fn loops(self) -> bool {
        matches!(self, Self::Alarm)
    }

    pub fn vibration_pattern_ms(self) -> &'static [u64] {
        match self {
            Self::Alarm => &ALARM_VIBRATION_PATTERN_MS,
            Self::Timer => &TIMER_VIBRATION_PATTERN_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertError(pub String);

impl Display for AlertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "alert output failed: {}", self.0)
    }
}

impl Error for AlertError {}

/// Platform sound + vibration output.
pub trait AlertOutput {
    fn start(&mut self, kind: AlertKind, vibrate: bool) -> Result<(), AlertError>;
    fn stop(&mut self);
}

/// Owns an `AlertOutput` and guarantees it is stopped on every exit path.
pub struct AlertHandle<A: AlertOutput> {
    output: A,
    active: Option<AlertKind>,
}

impl<A: AlertOutput> AlertHandle<A> {
    pub fn new(output: A) -> Self {
        Self {
            output,
            active: None,
        }
    }

    /// Starts `kind`, stopping whatever was playing first.
    ///
    /// Output failures are logged and swallowed; returns whether playback started.
    pub fn ring(&mut self, kind: AlertKind, vibrate: bool) -> bool {
        self.stop();
        match self.output.start(kind, vibrate) {
            Ok(()) => {
                info!(
                    "event=alert_start module=alert status=ok kind={} vibrate={}",
                    kind.as_str(),
                    vibrate
                );
                self.active = Some(kind);
                true
            }
            Err(err) => {
                error!(
                    "event=alert_start module=alert status=error kind={} error={}",
                    kind.as_str(),
                    err
                );
                false
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(kind) = self.active.take() {
            self.output.stop();
            info!(
                "event=alert_stop module=alert status=ok kind={}",
                kind.as_str()
            );
        }
    }

    pub fn active(&self) -> Option<AlertKind> {
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl<A: AlertOutput> Drop for AlertHandle<A> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Output that plays nothing itself.
///
/// Used where the host renders sound from engine state (`is_active`) and by
/// hosts without sound or vibration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlert;

impl AlertOutput for SilentAlert {
    fn start(&mut self, _kind: AlertKind, _vibrate: bool) -> Result<(), AlertError> {
        Ok(())
    }

    fn stop(&mut self) {}
}

/// What a `RecordingAlert` was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertCall {
    Start { kind: AlertKind, vibrate: bool },
    Stop,
}

/// Output that records calls; clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAlert {
    calls: Rc<RefCell<Vec<AlertCall>>>,
    fail: Rc<RefCell<bool>>,
}

impl RecordingAlert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.borrow_mut() = fail;
    }

    pub fn calls(&self) -> Vec<AlertCall> {
        self.calls.borrow().clone()
    }

    pub fn start_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, AlertCall::Start { .. }))
            .count()
    }
}

impl AlertOutput for RecordingAlert {
    fn start(&mut self, kind: AlertKind, vibrate: bool) -> Result<(), AlertError> {
        if *self.fail.borrow() {
            return Err(AlertError("recording alert set to fail".to_string()));
        }
        self.calls
            .borrow_mut()
            .push(AlertCall::Start { kind, vibrate });
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.borrow_mut().push(AlertCall::Stop);
    }
}
