use clockkit_core::engine::tick::STOPWATCH_TICK_INTERVAL;
use clockkit_core::format::display::format_stopwatch_time;
use clockkit_core::{
    EngineError, Lap, LapMark, ManualClock, ManualTicks, Stopwatch, StopwatchState,
};

fn stopwatch() -> (Stopwatch<ManualClock, ManualTicks>, ManualClock, ManualTicks) {
    let clock = ManualClock::at_epoch_ms(1_775_030_400_000);
    let ticks = ManualTicks::new();
    let stopwatch = Stopwatch::new(clock.clone(), ticks.clone());
    (stopwatch, clock, ticks)
}

#[test]
fn start_runs_ticks_at_display_cadence() {
    let (mut stopwatch, clock, ticks) = stopwatch();

    stopwatch.start().unwrap();
    clock.advance_ms(1_234);

    assert_eq!(stopwatch.state(), StopwatchState::Running);
    assert_eq!(stopwatch.tick(), Some(1_234));
    assert_eq!(format_stopwatch_time(stopwatch.elapsed_ms()), "00:01.23");
    assert_eq!(ticks.log().interval, Some(STOPWATCH_TICK_INTERVAL));
}

#[test]
fn laps_record_split_and_total_most_recent_first() {
    let (mut stopwatch, clock, _ticks) = stopwatch();
    stopwatch.start().unwrap();

    clock.advance_ms(1_500);
    stopwatch.lap().unwrap();
    clock.advance_ms(1_000);
    let second = stopwatch.lap().unwrap();

    assert_eq!(
        second,
        Lap {
            number: 2,
            lap_time_ms: 1_000,
            total_time_ms: 2_500,
        }
    );
    assert_eq!(
        stopwatch.laps(),
        &[
            Lap {
                number: 2,
                lap_time_ms: 1_000,
                total_time_ms: 2_500,
            },
            Lap {
                number: 1,
                lap_time_ms: 1_500,
                total_time_ms: 1_500,
            },
        ]
    );
}

#[test]
fn best_and_worst_need_two_laps() {
    let (mut stopwatch, clock, _ticks) = stopwatch();
    stopwatch.start().unwrap();
    clock.advance_ms(900);
    let only = stopwatch.lap().unwrap();

    assert_eq!(stopwatch.best_lap(), None);
    assert_eq!(stopwatch.worst_lap(), None);
    assert_eq!(stopwatch.lap_mark(&only), LapMark::Plain);
}

#[test]
fn best_and_worst_laps_are_marked() {
    let (mut stopwatch, clock, _ticks) = stopwatch();
    stopwatch.start().unwrap();
    clock.advance_ms(1_500);
    let slow = stopwatch.lap().unwrap();
    clock.advance_ms(1_000);
    let fast = stopwatch.lap().unwrap();
    clock.advance_ms(1_200);
    let middle = stopwatch.lap().unwrap();

    assert_eq!(stopwatch.best_lap(), Some(&fast));
    assert_eq!(stopwatch.worst_lap(), Some(&slow));
    assert_eq!(stopwatch.lap_mark(&fast), LapMark::Best);
    assert_eq!(stopwatch.lap_mark(&slow), LapMark::Worst);
    assert_eq!(stopwatch.lap_mark(&middle), LapMark::Plain);
}

#[test]
fn equal_laps_prefer_the_most_recent() {
    let (mut stopwatch, clock, _ticks) = stopwatch();
    stopwatch.start().unwrap();
    clock.advance_ms(1_000);
    stopwatch.lap().unwrap();
    clock.advance_ms(1_000);
    let latest = stopwatch.lap().unwrap();

    assert_eq!(stopwatch.best_lap(), Some(&latest));
    assert_eq!(stopwatch.worst_lap(), Some(&latest));
    assert_eq!(stopwatch.lap_mark(&latest), LapMark::Best);
}

#[test]
fn paused_time_is_excluded() {
    let (mut stopwatch, clock, ticks) = stopwatch();
    stopwatch.start().unwrap();
    clock.advance_ms(2_000);
    stopwatch.pause().unwrap();
    assert!(!ticks.log().active);

    clock.advance_ms(30_000);
    assert_eq!(stopwatch.elapsed_ms(), 2_000);
    assert_eq!(stopwatch.tick(), None);

    stopwatch.resume().unwrap();
    clock.advance_ms(500);
    assert_eq!(stopwatch.elapsed_ms(), 2_500);

    let lap = stopwatch.lap().unwrap();
    assert_eq!(lap.total_time_ms, 2_500);
}

#[test]
fn lap_is_only_allowed_while_running() {
    let (mut stopwatch, _clock, _ticks) = stopwatch();

    assert_eq!(
        stopwatch.lap().unwrap_err(),
        EngineError::InvalidTransition {
            state: "idle",
            action: "lap"
        }
    );
    stopwatch.start().unwrap();
    stopwatch.pause().unwrap();
    assert!(stopwatch.lap().is_err());
}

#[test]
fn reset_clears_time_and_laps_even_while_running() {
    let (mut stopwatch, clock, ticks) = stopwatch();
    stopwatch.start().unwrap();
    clock.advance_ms(700);
    stopwatch.lap().unwrap();

    stopwatch.reset().unwrap();

    assert_eq!(stopwatch.state(), StopwatchState::Idle);
    assert_eq!(stopwatch.elapsed_ms(), 0);
    assert!(stopwatch.laps().is_empty());
    assert!(!ticks.log().active);
    assert!(stopwatch.reset().is_err());
}

#[test]
fn start_and_resume_follow_the_state_machine() {
    let (mut stopwatch, _clock, _ticks) = stopwatch();

    assert!(stopwatch.resume().is_err());
    assert!(stopwatch.pause().is_err());
    stopwatch.start().unwrap();
    assert!(stopwatch.start().is_err());
    stopwatch.pause().unwrap();
    assert!(stopwatch.start().is_err());
    stopwatch.resume().unwrap();
}

#[test]
fn clock_moving_backwards_never_yields_negative_elapsed() {
    let (mut stopwatch, clock, _ticks) = stopwatch();
    stopwatch.start().unwrap();
    clock.advance_ms(1_000);
    stopwatch.pause().unwrap();
    stopwatch.resume().unwrap();

    clock.advance_ms(-5_000);

    assert_eq!(stopwatch.elapsed_ms(), 1_000);
}

#[test]
fn dropping_the_stopwatch_stops_ticks() {
    let (mut stopwatch, _clock, ticks) = stopwatch();
    stopwatch.start().unwrap();

    drop(stopwatch);

    assert!(!ticks.log().active);
}

#[test]
fn lap_numbers_track_the_lap_count() {
    let (mut stopwatch, clock, _ticks) = stopwatch();
    stopwatch.start().unwrap();

    for _ in 0..1_000 {
        clock.advance_ms(10);
        stopwatch.lap().unwrap();
    }

    let laps = stopwatch.laps();
    assert_eq!(laps.len(), 1_000);
    assert_eq!(laps[0].number, 1_000);
    assert_eq!(laps[999].number, 1);
}
