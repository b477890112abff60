//! Stopwatch engine with lap recording.
//!
//! # Invariants
//! - Elapsed time is `accumulated + (now - run_start)` while running.
//! - Laps are stored most-recent-first and numbered from 1.
//! - Best/worst marks exist only when at least two laps were recorded.

use crate::engine::clock::Clock;
use crate::engine::tick::{TickSource, STOPWATCH_TICK_INTERVAL};
use crate::engine::EngineError;
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchState {
    Idle,
    Running,
    Paused,
}

impl StopwatchState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

/// One lap checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lap {
    pub number: usize,
    /// Time since the previous lap (or since start for lap 1).
    pub lap_time_ms: u64,
    /// Elapsed time when the lap was taken.
    pub total_time_ms: u64,
}

/// Display classification of a lap row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapMark {
    Best,
    Worst,
    Plain,
}

pub struct Stopwatch<C: Clock, T: TickSource> {
    clock: C,
    ticks: T,
    state: StopwatchState,
    accumulated_ms: u64,
    run_start_ms: Option<i64>,
    laps: Vec<Lap>,
}

impl<C: Clock, T: TickSource> Stopwatch<C, T> {
    pub fn new(clock: C, ticks: T) -> Self {
        Self {
            clock,
            ticks,
            state: StopwatchState::Idle,
            accumulated_ms: 0,
            run_start_ms: None,
            laps: Vec::new(),
        }
    }

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn start(&mut self) -> Result<(), EngineError> {
        self.require(StopwatchState::Idle, "start")?;
        self.begin_run();
        info!("event=stopwatch_start module=stopwatch status=ok");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), EngineError> {
        self.require(StopwatchState::Paused, "resume")?;
        self.begin_run();
        info!(
            "event=stopwatch_resume module=stopwatch status=ok accumulated_ms={}",
            self.accumulated_ms
        );
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), EngineError> {
        self.require(StopwatchState::Running, "pause")?;
        self.ticks.cancel();
        self.accumulated_ms = self.elapsed_ms();
        self.run_start_ms = None;
        self.state = StopwatchState::Paused;
        info!(
            "event=stopwatch_pause module=stopwatch status=ok accumulated_ms={}",
            self.accumulated_ms
        );
        Ok(())
    }

    /// Clears elapsed time and laps. Allowed while running; the run is stopped first.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        if self.state == StopwatchState::Idle {
            return Err(EngineError::InvalidTransition {
                state: self.state.as_str(),
                action: "reset",
            });
        }
        self.ticks.cancel();
        self.accumulated_ms = 0;
        self.run_start_ms = None;
        self.laps.clear();
        self.state = StopwatchState::Idle;
        info!("event=stopwatch_reset module=stopwatch status=ok");
        Ok(())
    }

    /// Records a lap at the current elapsed time and returns it.
    pub fn lap(&mut self) -> Result<Lap, EngineError> {
        self.require(StopwatchState::Running, "lap")?;
        let total_time_ms = self.elapsed_ms();
        let previous_total = self.laps.first().map_or(0, |lap| lap.total_time_ms);
        let lap = Lap {
            number: self.laps.len() + 1,
            lap_time_ms: total_time_ms.saturating_sub(previous_total),
            total_time_ms,
        };
        self.laps.insert(0, lap);
        debug!(
            "event=stopwatch_lap module=stopwatch status=ok number={} lap_ms={}",
            lap.number, lap.lap_time_ms
        );
        Ok(lap)
    }

    /// Current elapsed time for display; `None` when the tick should be ignored.
    pub fn tick(&self) -> Option<u64> {
        (self.state == StopwatchState::Running).then(|| self.elapsed_ms())
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self.run_start_ms {
            Some(start) => {
                let running = self.clock.now_ms().saturating_sub(start).max(0) as u64;
                self.accumulated_ms.saturating_add(running)
            }
            None => self.accumulated_ms,
        }
    }

    /// Laps, most recent first.
    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    /// Fastest lap; ties go to the first one in display order.
    pub fn best_lap(&self) -> Option<&Lap> {
        if self.laps.len() < 2 {
            return None;
        }
        self.laps.iter().reduce(|best, lap| {
            if lap.lap_time_ms < best.lap_time_ms {
                lap
            } else {
                best
            }
        })
    }

    /// Slowest lap; ties go to the first one in display order.
    pub fn worst_lap(&self) -> Option<&Lap> {
        if self.laps.len() < 2 {
            return None;
        }
        self.laps.iter().reduce(|worst, lap| {
            if lap.lap_time_ms > worst.lap_time_ms {
                lap
            } else {
                worst
            }
        })
    }

    /// Mark for one lap row. Best wins when a lap is both.
    pub fn lap_mark(&self, lap: &Lap) -> LapMark {
        if self.best_lap().is_some_and(|best| best.number == lap.number) {
            LapMark::Best
        } else if self.worst_lap().is_some_and(|worst| worst.number == lap.number) {
            LapMark::Worst
        } else {
            LapMark::Plain
        }
    }

    fn begin_run(&mut self) {
        self.run_start_ms = Some(self.clock.now_ms());
        self.state = StopwatchState::Running;
        self.ticks.start(STOPWATCH_TICK_INTERVAL);
    }

    fn require(&self, expected: StopwatchState, action: &'static str) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidTransition {
                state: self.state.as_str(),
                action,
            })
        }
    }
}

impl<C: Clock, T: TickSource> Drop for Stopwatch<C, T> {
    fn drop(&mut self) {
        self.ticks.cancel();
    }
}
