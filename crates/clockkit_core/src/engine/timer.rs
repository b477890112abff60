//! Countdown timer engine.
//!
//! # Invariants
//! - Remaining time is `budget - (now - anchor)` while running; ticks only
//!   trigger the recomputation, they never decrement a counter.
//! - `Finished` is entered at most once per start; later ticks are no-ops.
//! - While paused there is no pending "timer finished" notification.
//!
//! State machine: `Idle -> Running -> {Paused, Finished}`, `Paused -> Running`,
//! `{Running, Paused, Finished} -> Idle` via `reset`.

use crate::engine::alert::{AlertHandle, AlertKind, AlertOutput};
use crate::engine::clock::Clock;
use crate::engine::tick::{TickSource, TIMER_TICK_INTERVAL};
use crate::engine::EngineError;
use crate::notify::gateway::{NotificationGateway, NotificationPayload};
use log::{info, warn};

/// Registration id of the pending "timer finished" notification.
pub const TIMER_NOTIFICATION_ID: &str = "timer_notification";

const MS_PER_SECOND: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

impl TimerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Tick arrived while not running.
    Ignored,
    Running { remaining_seconds: u64 },
    /// Emitted exactly once, on the tick that crosses zero.
    Finished,
}

/// Hours/minutes/seconds picker values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerInput {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Default for TimerInput {
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 5,
            seconds: 0,
        }
    }
}

/// Which picker column to adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerField {
    Hours,
    Minutes,
    Seconds,
}

impl TimerField {
    fn max(self) -> u32 {
        match self {
            Self::Hours => 23,
            Self::Minutes | Self::Seconds => 59,
        }
    }
}

impl TimerInput {
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// Steps one column by `delta`, wrapping below zero to max and above max to zero.
    pub fn adjust(&mut self, field: TimerField, delta: i32) {
        let max = field.max();
        let slot = match field {
            TimerField::Hours => &mut self.hours,
            TimerField::Minutes => &mut self.minutes,
            TimerField::Seconds => &mut self.seconds,
        };
        let next = i64::from(*slot) + i64::from(delta);
        *slot = if next < 0 {
            max
        } else if next > i64::from(max) {
            0
        } else {
            next as u32
        };
    }
}

/// Countdown engine driven by host ticks.
pub struct CountdownTimer<C, G, T, A>
where
    C: Clock,
    G: NotificationGateway,
    T: TickSource,
    A: AlertOutput,
{
    clock: C,
    gateway: G,
    ticks: T,
    alert: AlertHandle<A>,
    vibrate: bool,
    state: TimerState,
    duration_seconds: u64,
    /// Remaining milliseconds at `anchor_ms`; the frozen value while paused.
    budget_ms: i64,
    anchor_ms: Option<i64>,
}

impl<C, G, T, A> CountdownTimer<C, G, T, A>
where
    C: Clock,
    G: NotificationGateway,
    T: TickSource,
    A: AlertOutput,
{
    pub fn new(clock: C, gateway: G, ticks: T, alert: A) -> Self {
        Self {
            clock,
            gateway,
            ticks,
            alert: AlertHandle::new(alert),
            vibrate: true,
            state: TimerState::Idle,
            duration_seconds: 0,
            budget_ms: 0,
            anchor_ms: None,
        }
    }

    /// Whether the finish alert vibrates.
    pub fn set_vibrate(&mut self, vibrate: bool) {
        self.vibrate = vibrate;
    }

    pub fn vibrates(&self) -> bool {
        self.vibrate
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    pub fn alert_active(&self) -> bool {
        self.alert.is_active()
    }

    /// Gateway the finish notification goes through.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    /// Starts a countdown of `duration_seconds`.
    ///
    /// A zero duration is accepted and finishes on the next tick.
    pub fn start(&mut self, duration_seconds: u64) -> Result<(), EngineError> {
        self.require(TimerState::Idle, "start")?;
        let now = self.clock.now_ms();
        self.duration_seconds = duration_seconds;
        self.budget_ms = seconds_to_ms(duration_seconds);
        self.anchor_ms = Some(now);
        self.state = TimerState::Running;
        self.schedule_finish_notification(now);
        self.ticks.start(TIMER_TICK_INTERVAL);
        info!(
            "event=timer_start module=timer status=ok duration_s={}",
            duration_seconds
        );
        Ok(())
    }

    /// Recomputes remaining time from the anchor and finishes at zero.
    pub fn tick(&mut self) -> TimerTick {
        if self.state != TimerState::Running {
            return TimerTick::Ignored;
        }
        let remaining_ms = self.live_remaining_ms();
        if remaining_ms <= 0 {
            self.finish();
            return TimerTick::Finished;
        }
        TimerTick::Running {
            remaining_seconds: ms_to_display_seconds(remaining_ms),
        }
    }

    /// Freezes remaining time and withdraws the pending notification.
    ///
    /// If the countdown has already crossed zero the timer finishes instead.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        self.require(TimerState::Running, "pause")?;
        let remaining_ms = self.live_remaining_ms();
        self.ticks.cancel();
        if remaining_ms <= 0 {
            self.finish();
            return Ok(());
        }
        self.budget_ms = remaining_ms;
        self.anchor_ms = None;
        self.state = TimerState::Paused;
        self.cancel_finish_notification();
        info!(
            "event=timer_pause module=timer status=ok remaining_ms={}",
            remaining_ms
        );
        Ok(())
    }

    /// Re-anchors at now with the frozen remaining time.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        self.require(TimerState::Paused, "resume")?;
        let now = self.clock.now_ms();
        self.anchor_ms = Some(now);
        self.state = TimerState::Running;
        self.schedule_finish_notification(now);
        self.ticks.start(TIMER_TICK_INTERVAL);
        info!(
            "event=timer_resume module=timer status=ok remaining_ms={}",
            self.budget_ms
        );
        Ok(())
    }

    /// Returns to `Idle` from any other state.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        if self.state == TimerState::Idle {
            return Err(EngineError::InvalidTransition {
                state: self.state.as_str(),
                action: "reset",
            });
        }
        self.ticks.cancel();
        self.cancel_finish_notification();
        self.alert.stop();
        self.state = TimerState::Idle;
        self.duration_seconds = 0;
        self.budget_ms = 0;
        self.anchor_ms = None;
        info!("event=timer_reset module=timer status=ok");
        Ok(())
    }

    /// Silences the finish alert; the timer stays `Finished` until reset.
    pub fn dismiss_alert(&mut self) {
        self.alert.stop();
    }

    /// Whole seconds left, rounded up so a fresh 300 s timer shows 300.
    pub fn remaining_seconds(&self) -> u64 {
        ms_to_display_seconds(self.remaining_ms())
    }

    pub fn remaining_ms(&self) -> i64 {
        match self.state {
            TimerState::Idle | TimerState::Finished => 0,
            TimerState::Paused => self.budget_ms,
            TimerState::Running => self.live_remaining_ms().max(0),
        }
    }

    /// `remaining / duration`, clamped to `[0, 1]`; `1.0` for a zero duration.
    pub fn progress(&self) -> f64 {
        let duration_ms = seconds_to_ms(self.duration_seconds);
        if duration_ms == 0 {
            return 1.0;
        }
        (self.remaining_ms() as f64 / duration_ms as f64).clamp(0.0, 1.0)
    }

    fn live_remaining_ms(&self) -> i64 {
        match self.anchor_ms {
            Some(anchor) => {
                let elapsed = self.clock.now_ms().saturating_sub(anchor).max(0);
                self.budget_ms.saturating_sub(elapsed)
            }
            None => self.budget_ms,
        }
    }

    fn finish(&mut self) {
        self.ticks.cancel();
        self.state = TimerState::Finished;
        self.budget_ms = 0;
        self.anchor_ms = None;
        info!(
            "event=timer_finish module=timer status=ok duration_s={}",
            self.duration_seconds
        );
        self.alert.ring(AlertKind::Timer, self.vibrate);
    }

    fn require(&self, expected: TimerState, action: &'static str) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidTransition {
                state: self.state.as_str(),
                action,
            })
        }
    }

    fn schedule_finish_notification(&self, now_ms: i64) {
        let when = now_ms.saturating_add(self.budget_ms);
        if let Err(err) = self.gateway.schedule_one_shot(
            TIMER_NOTIFICATION_ID,
            when,
            &NotificationPayload::timer_finished(),
        ) {
            warn!(
                "event=timer_notify module=timer status=error action=schedule error={}",
                err
            );
        }
    }

    fn cancel_finish_notification(&self) {
        if let Err(err) = self.gateway.cancel(TIMER_NOTIFICATION_ID) {
            warn!(
                "event=timer_notify module=timer status=error action=cancel error={}",
                err
            );
        }
    }
}

impl<C, G, T, A> Drop for CountdownTimer<C, G, T, A>
where
    C: Clock,
    G: NotificationGateway,
    T: TickSource,
    A: AlertOutput,
{
    fn drop(&mut self) {
        self.ticks.cancel();
    }
}

fn seconds_to_ms(seconds: u64) -> i64 {
    i64::try_from(seconds)
        .unwrap_or(i64::MAX)
        .saturating_mul(MS_PER_SECOND)
}

fn ms_to_display_seconds(ms: i64) -> u64 {
    if ms <= 0 {
        return 0;
    }
    // Ceiling division without `ms + 999`, which overflows for a saturated budget.
    ((ms - 1) / MS_PER_SECOND + 1) as u64
}
