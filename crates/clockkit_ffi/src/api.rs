//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose alarm, world clock, timer, stopwatch, and formatting use-cases to
//!   Dart via FRB.
//! - Hand notification side effects back to the host as replayable commands.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Alarm calls take the ids the platform currently holds (`scheduled_ids`)
//!   so cancel-by-prefix sees registrations made by earlier processes.
//! - Store access is serialized process-wide; every call reads and writes the
//!   full list.
//! - There is one countdown, one stopwatch, and one ringing alarm per process.
//!   The host polls at `tick_interval_ms` and plays sound while a snapshot
//!   reports the alert as ringing.

use chrono::{Local, Timelike};
use clockkit_core::db::open_db;
use clockkit_core::format::display::{
    format_alarm_time, format_clock_time, format_stopwatch_time, format_timer_display,
};
use clockkit_core::format::recurrence::repeat_text;
use clockkit_core::format::zone::{format_time_in_zone, timezone_offset_label};
use clockkit_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    search_catalog, Alarm, AlarmDraft, AlarmScheduler, AlarmService, AlarmSound, AlarmStore,
    AlarmStoreError, AlarmStoreResult, AlertHandle, AlertKind, Clock, CountdownTimer,
    DisplaySettings, EngineError, FiredOutcome, GatewayCommand, LapMark, ManualTicks,
    NotificationPayload, RecordingGateway, SilentAlert, SqliteKeyValueStore, Stopwatch,
    SystemClock, TimerField, TimerInput, TimerTick, Weekday, WorldClockEntry, WorldClockStore,
};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

const ENTRY_DB_FILE_NAME: &str = "clockkit_entry.sqlite3";
static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static ENTRY_LOCK: Mutex<()> = Mutex::new(());
static TIMER: Mutex<Option<HostTimer>> = Mutex::new(None);
static STOPWATCH: Mutex<Option<HostStopwatch>> = Mutex::new(None);
static RINGING: Mutex<Option<RingingAlarm>> = Mutex::new(None);

type EntryAlarmService<'conn, 'gw> =
    AlarmService<SqliteKeyValueStore<'conn>, SystemClock, &'gw RecordingGateway, Local>;
type HostTimer = CountdownTimer<SystemClock, RecordingGateway, ManualTicks, SilentAlert>;
type HostStopwatch = Stopwatch<SystemClock, ManualTicks>;

struct RingingAlarm {
    alarm_id: String,
    alert: AlertHandle<SilentAlert>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Alarm editor fields as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmInput {
    pub hour: u32,
    pub minute: u32,
    pub label: String,
    /// Day keys `sun|mon|tue|wed|thu|fri|sat`; empty for a one-shot alarm.
    pub repeat_days: Vec<String>,
    /// One of `default|gentle|classic|digital|nature|melody`.
    pub sound_id: String,
    pub vibrate: bool,
    pub auto_delete: bool,
}

/// Alarm row ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmItem {
    pub id: String,
    pub hour: u32,
    pub minute: u32,
    pub label: String,
    pub repeat_days: Vec<String>,
    pub sound_id: String,
    pub vibrate: bool,
    pub auto_delete: bool,
    pub enabled: bool,
    /// Pre-formatted time honoring the requested clock style.
    pub time_text: String,
    /// `Once`, `Every day`, `Weekdays`, `Weekends`, or `Mon, Wed`.
    pub repeat_text: String,
}

/// Notification request the host must replay against the platform scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCommand {
    /// `schedule_once|schedule_weekly|cancel`.
    pub action: String,
    pub id: String,
    pub when_epoch_ms: Option<i64>,
    /// Sunday = 1 ... Saturday = 7.
    pub weekday: Option<u8>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub channel_id: Option<String>,
    pub alarm_id: Option<String>,
}

/// Response envelope for alarm list reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmListResponse {
    pub ok: bool,
    pub items: Vec<AlarmItem>,
    pub message: String,
}

/// Response envelope for alarm mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmActionResponse {
    pub ok: bool,
    /// Alarm after the action; the removed alarm for deletions.
    pub alarm: Option<AlarmItem>,
    pub commands: Vec<NotificationCommand>,
    pub message: String,
}

impl AlarmActionResponse {
    fn success(
        message: impl Into<String>,
        alarm: Option<AlarmItem>,
        commands: Vec<NotificationCommand>,
    ) -> Self {
        Self {
            ok: true,
            alarm,
            commands,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            alarm: None,
            commands: Vec::new(),
            message: message.into(),
        }
    }
}

/// World clock row with the current time in that zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldClockItem {
    pub city: String,
    pub country: String,
    pub timezone: String,
    pub flag: String,
    pub time_text: String,
    /// `Same time`, `+5h`, `-3h` relative to the device zone.
    pub offset_label: String,
}

/// Generic response envelope for world clock mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldClockActionResponse {
    pub ok: bool,
    pub changed: bool,
    pub message: String,
}

/// Lists alarms sorted by time of day.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_list(use_24_hour: bool) -> AlarmListResponse {
    match with_alarm_service(Vec::new(), |service| Ok(service.list())) {
        Ok((alarms, _)) => {
            let items = alarms
                .iter()
                .map(|alarm| to_alarm_item(alarm, use_24_hour))
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No alarms.".to_string()
            } else {
                format!("{} alarm(s).", items.len())
            };
            AlarmListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => AlarmListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("alarm_list failed: {err}"),
        },
    }
}

/// Creates (`editing_id = None`) or updates an alarm, then schedules it.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the saved alarm and the notification commands to replay.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_save(
    input: AlarmInput,
    editing_id: Option<String>,
    scheduled_ids: Vec<String>,
    use_24_hour: bool,
) -> AlarmActionResponse {
    let draft = match to_draft(&input) {
        Ok(draft) => draft,
        Err(err) => return AlarmActionResponse::failure(format!("alarm_save failed: {err}")),
    };
    let editing_id = editing_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    let result = with_alarm_service(scheduled_ids, |service| {
        service.save(&draft, editing_id.as_deref())
    });
    match result {
        Ok((alarm, commands)) => AlarmActionResponse::success(
            "Alarm saved.",
            Some(to_alarm_item(&alarm, use_24_hour)),
            commands,
        ),
        Err(err) => AlarmActionResponse::failure(format!("alarm_save failed: {err}")),
    }
}

/// Cancels an alarm's notifications and deletes it.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_delete(id: String, scheduled_ids: Vec<String>) -> AlarmActionResponse {
    match with_alarm_service(scheduled_ids, |service| service.delete(id.trim())) {
        Ok((alarm, commands)) => AlarmActionResponse::success(
            "Alarm deleted.",
            Some(to_alarm_item(&alarm, false)),
            commands,
        ),
        Err(err) => AlarmActionResponse::failure(format!("alarm_delete failed: {err}")),
    }
}

/// Flips an alarm on or off, scheduling or cancelling its notifications.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_toggle(
    id: String,
    scheduled_ids: Vec<String>,
    use_24_hour: bool,
) -> AlarmActionResponse {
    match with_alarm_service(scheduled_ids, |service| service.toggle(id.trim())) {
        Ok((alarm, commands)) => {
            let message = if alarm.enabled {
                "Alarm enabled."
            } else {
                "Alarm disabled."
            };
            AlarmActionResponse::success(
                message,
                Some(to_alarm_item(&alarm, use_24_hour)),
                commands,
            )
        }
        Err(err) => AlarmActionResponse::failure(format!("alarm_toggle failed: {err}")),
    }
}

/// Applies post-firing rules after the host delivered an alarm notification.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_fired(id: String, scheduled_ids: Vec<String>) -> AlarmActionResponse {
    match with_alarm_service(scheduled_ids, |service| service.handle_fired(id.trim())) {
        Ok((outcome, commands)) => {
            let (message, alarm) = match outcome {
                FiredOutcome::Deleted(alarm) => ("Alarm removed after firing.", alarm),
                FiredOutcome::Disabled(alarm) => ("Alarm disabled after firing.", alarm),
                FiredOutcome::Repeating(alarm) => ("Alarm repeats.", alarm),
            };
            AlarmActionResponse::success(message, Some(to_alarm_item(&alarm, false)), commands)
        }
        Err(err) => AlarmActionResponse::failure(format!("alarm_fired failed: {err}")),
    }
}

/// Reconciles platform registrations with stored alarms, e.g. on app start.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_resync(scheduled_ids: Vec<String>) -> AlarmActionResponse {
    match with_alarm_service(scheduled_ids, |service| Ok(service.resync())) {
        Ok((report, commands)) => AlarmActionResponse::success(
            format!(
                "Rescheduled {}, cancelled {} disabled and {} orphaned.",
                report.scheduled, report.disabled, report.orphans_cancelled
            ),
            None,
            commands,
        ),
        Err(err) => AlarmActionResponse::failure(format!("alarm_resync failed: {err}")),
    }
}

/// Lists saved world clocks with their current local time.
#[flutter_rust_bridge::frb(sync)]
pub fn world_clock_list(use_24_hour: bool) -> Vec<WorldClockItem> {
    match with_world_clock_store(|store| store.list().to_vec()) {
        Ok(entries) => {
            let now = SystemClock.now();
            entries
                .into_iter()
                .map(|entry| {
                    let time_text = format_time_in_zone(&entry.timezone, now, use_24_hour)
                        .unwrap_or_else(|_| "--:--".to_string());
                    let offset_label = timezone_offset_label(&entry.timezone, now, &Local)
                        .unwrap_or_default();
                    WorldClockItem {
                        city: entry.city,
                        country: entry.country,
                        timezone: entry.timezone,
                        flag: entry.flag,
                        time_text,
                        offset_label,
                    }
                })
                .collect()
        }
        Err(err) => {
            warn!("event=world_clock_list module=ffi status=error error={err}");
            Vec::new()
        }
    }
}

/// Searches the built-in city catalog by city or country name.
#[flutter_rust_bridge::frb(sync)]
pub fn world_clock_search(query: String) -> Vec<WorldClockItem> {
    search_catalog(&query)
        .into_iter()
        .map(|city| WorldClockItem {
            city: city.city.to_string(),
            country: city.country.to_string(),
            timezone: city.timezone.to_string(),
            flag: city.flag.to_string(),
            time_text: String::new(),
            offset_label: String::new(),
        })
        .collect()
}

/// Adds a city; a timezone already listed is left as is.
#[flutter_rust_bridge::frb(sync)]
pub fn world_clock_add(
    city: String,
    country: String,
    timezone: String,
    flag: String,
) -> WorldClockActionResponse {
    let entry = WorldClockEntry {
        city: city.trim().to_string(),
        country: country.trim().to_string(),
        timezone: timezone.trim().to_string(),
        flag,
    };
    match with_world_clock_store(|store| store.add(entry)) {
        Ok(Ok(true)) => world_clock_response(true, true, "World clock added."),
        Ok(Ok(false)) => world_clock_response(true, false, "World clock already listed."),
        Ok(Err(err)) => {
            world_clock_response(false, false, format!("world_clock_add failed: {err}"))
        }
        Err(err) => world_clock_response(false, false, format!("world_clock_add failed: {err}")),
    }
}

/// Removes the city listed under `timezone`; a missing entry is not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn world_clock_remove(timezone: String) -> WorldClockActionResponse {
    match with_world_clock_store(|store| store.remove(timezone.trim())) {
        Ok(true) => world_clock_response(true, true, "World clock removed."),
        Ok(false) => world_clock_response(true, false, "World clock not listed."),
        Err(err) => {
            world_clock_response(false, false, format!("world_clock_remove failed: {err}"))
        }
    }
}

/// Alarm time in list style, e.g. `06:30 AM` or `06:30`.
#[flutter_rust_bridge::frb(sync)]
pub fn format_alarm(hour: u32, minute: u32, use_24_hour: bool) -> String {
    format_alarm_time(hour, minute, use_24_hour)
}

/// Stopwatch display `MM:SS.cc`.
#[flutter_rust_bridge::frb(sync)]
pub fn format_stopwatch(elapsed_ms: u64) -> String {
    format_stopwatch_time(elapsed_ms)
}

/// Countdown display `HH:MM:SS`.
#[flutter_rust_bridge::frb(sync)]
pub fn format_timer(total_seconds: u64) -> String {
    format_timer_display(total_seconds)
}

/// Current time for the main clock, styled by the host's settings JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn clock_now(settings_json: String) -> String {
    let settings = DisplaySettings::from_json(&settings_json);
    let now = Local::now();
    format_clock_time(
        now.hour(),
        now.minute(),
        now.second(),
        settings.use_24_hour,
        settings.show_seconds,
    )
}

/// Editor defaults for a new alarm: the current time plus the user's
/// preferred sound, vibration and auto-delete settings.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_new_draft(settings_json: String) -> AlarmInput {
    let settings = DisplaySettings::from_json(&settings_json);
    let draft = settings.new_alarm_draft(Local::now());
    AlarmInput {
        hour: draft.hour,
        minute: draft.minute,
        label: draft.label,
        repeat_days: draft
            .repeat_days
            .iter()
            .map(|day| day.key().to_string())
            .collect(),
        sound_id: draft.sound_id.id().to_string(),
        vibrate: draft.vibrate,
        auto_delete: draft.auto_delete,
    }
}

/// Alarm that is currently sounding in the foreground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRingResponse {
    pub ok: bool,
    pub alarm: Option<AlarmItem>,
    pub ringing: bool,
    /// Tone to loop; empty when sound is turned off in settings.
    pub sound_id: String,
    /// Repeated every 5 s while ringing; empty when vibration is off.
    pub vibration_pattern_ms: Vec<u64>,
    pub message: String,
}

impl AlarmRingResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            alarm: None,
            ringing: false,
            sound_id: String::new(),
            vibration_pattern_ms: Vec::new(),
            message: message.into(),
        }
    }
}

/// Starts the ring for a delivered alarm, replacing any alarm already ringing.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_ring(id: String, settings_json: String) -> AlarmRingResponse {
    let settings = DisplaySettings::from_json(&settings_json);
    let id = id.trim().to_string();
    let alarm = match with_alarm_service(Vec::new(), |service| {
        service
            .get(&id)
            .cloned()
            .ok_or_else(|| AlarmStoreError::NotFound(id.clone()))
    }) {
        Ok((alarm, _)) => alarm,
        Err(err) => return AlarmRingResponse::failure(format!("alarm_ring failed: {err}")),
    };

    let vibrate = alarm.vibrate && settings.vibration_enabled;
    let mut ringing = RINGING.lock().unwrap_or_else(PoisonError::into_inner);
    let slot = ringing.get_or_insert_with(|| RingingAlarm {
        alarm_id: String::new(),
        alert: AlertHandle::new(SilentAlert),
    });
    let started = slot.alert.ring(AlertKind::Alarm, vibrate);
    slot.alarm_id = alarm.id.clone();

    AlarmRingResponse {
        ok: started,
        ringing: started,
        sound_id: if settings.sound_enabled {
            alarm.sound_id.id().to_string()
        } else {
            String::new()
        },
        vibration_pattern_ms: if vibrate {
            AlertKind::Alarm.vibration_pattern_ms().to_vec()
        } else {
            Vec::new()
        },
        message: if started {
            "Alarm ringing.".to_string()
        } else {
            "alarm_ring failed: alert output unavailable".to_string()
        },
        alarm: Some(to_alarm_item(&alarm, settings.use_24_hour)),
    }
}

/// Stops the ring for `id` and applies the post-firing rules.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_dismiss(id: String, scheduled_ids: Vec<String>) -> AlarmActionResponse {
    let id = id.trim().to_string();
    {
        let mut ringing = RINGING.lock().unwrap_or_else(PoisonError::into_inner);
        if ringing.as_ref().is_some_and(|slot| slot.alarm_id == id) {
            // Dropping the handle stops the alert.
            ringing.take();
        }
    }
    alarm_fired(id, scheduled_ids)
}

/// Whether an alarm is still ringing, e.g. after the app returns to foreground.
#[flutter_rust_bridge::frb(sync)]
pub fn alarm_ringing_id() -> Option<String> {
    RINGING
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .filter(|slot| slot.alert.is_active())
        .map(|slot| slot.alarm_id.clone())
}

/// Countdown view after an action.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub ok: bool,
    /// `idle|running|paused|finished`.
    pub state: String,
    pub remaining_seconds: u64,
    /// `HH:MM:SS`.
    pub display_text: String,
    /// Fraction left, `0.0..=1.0`.
    pub progress: f64,
    /// Set only on the tick that crossed zero.
    pub just_finished: bool,
    pub alert_ringing: bool,
    pub vibration_pattern_ms: Vec<u64>,
    /// Poll cadence while running.
    pub tick_interval_ms: Option<u64>,
    pub commands: Vec<NotificationCommand>,
    pub message: String,
}

/// Picker columns for the countdown duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerPicker {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub total_seconds: u64,
}

/// Steps one picker column (`hours|minutes|seconds`) with wrap-around.
///
/// An unknown column leaves the values unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn timer_adjust_input(
    hours: u32,
    minutes: u32,
    seconds: u32,
    field: String,
    delta: i32,
) -> TimerPicker {
    let mut input = TimerInput {
        hours,
        minutes,
        seconds,
    };
    let field = match field.trim().to_ascii_lowercase().as_str() {
        "hours" => Some(TimerField::Hours),
        "minutes" => Some(TimerField::Minutes),
        "seconds" => Some(TimerField::Seconds),
        _ => None,
    };
    if let Some(field) = field {
        input.adjust(field, delta);
    }
    TimerPicker {
        hours: input.hours,
        minutes: input.minutes,
        seconds: input.seconds,
        total_seconds: input.total_seconds(),
    }
}

/// Starts the countdown; vibration follows the settings JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn timer_start(duration_seconds: u64, settings_json: String) -> TimerSnapshot {
    let settings = DisplaySettings::from_json(&settings_json);
    with_timer("start", |timer| {
        timer.set_vibrate(settings.vibration_enabled);
        timer.start(duration_seconds).map(|()| false)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn timer_pause() -> TimerSnapshot {
    with_timer("pause", |timer| timer.pause().map(|()| false))
}

#[flutter_rust_bridge::frb(sync)]
pub fn timer_resume() -> TimerSnapshot {
    with_timer("resume", |timer| timer.resume().map(|()| false))
}

#[flutter_rust_bridge::frb(sync)]
pub fn timer_reset() -> TimerSnapshot {
    with_timer("reset", |timer| timer.reset().map(|()| false))
}

/// Recomputes remaining time; call at `tick_interval_ms` while running.
#[flutter_rust_bridge::frb(sync)]
pub fn timer_tick() -> TimerSnapshot {
    with_timer("tick", |timer| {
        Ok(matches!(timer.tick(), TimerTick::Finished))
    })
}

/// Silences the finish alert; the countdown stays finished until reset.
#[flutter_rust_bridge::frb(sync)]
pub fn timer_dismiss_alert() -> TimerSnapshot {
    with_timer("dismiss_alert", |timer| {
        timer.dismiss_alert();
        Ok(false)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn timer_snapshot() -> TimerSnapshot {
    with_timer("snapshot", |_| Ok(false))
}

/// One lap row ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapItem {
    pub number: u64,
    pub lap_time_ms: u64,
    pub total_time_ms: u64,
    pub lap_text: String,
    pub total_text: String,
    /// `best|worst`, or empty.
    pub mark: String,
}

/// Stopwatch view after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwatchSnapshot {
    pub ok: bool,
    /// `idle|running|paused`.
    pub state: String,
    pub elapsed_ms: u64,
    /// `MM:SS.cc`.
    pub display_text: String,
    /// Most recent first.
    pub laps: Vec<LapItem>,
    pub tick_interval_ms: Option<u64>,
    pub message: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn stopwatch_start() -> StopwatchSnapshot {
    with_stopwatch("start", |stopwatch| stopwatch.start())
}

#[flutter_rust_bridge::frb(sync)]
pub fn stopwatch_pause() -> StopwatchSnapshot {
    with_stopwatch("pause", |stopwatch| stopwatch.pause())
}

#[flutter_rust_bridge::frb(sync)]
pub fn stopwatch_resume() -> StopwatchSnapshot {
    with_stopwatch("resume", |stopwatch| stopwatch.resume())
}

#[flutter_rust_bridge::frb(sync)]
pub fn stopwatch_reset() -> StopwatchSnapshot {
    with_stopwatch("reset", |stopwatch| stopwatch.reset())
}

#[flutter_rust_bridge::frb(sync)]
pub fn stopwatch_lap() -> StopwatchSnapshot {
    with_stopwatch("lap", |stopwatch| stopwatch.lap().map(|_| ()))
}

/// Current elapsed time; call at `tick_interval_ms` while running.
#[flutter_rust_bridge::frb(sync)]
pub fn stopwatch_snapshot() -> StopwatchSnapshot {
    with_stopwatch("snapshot", |_| Ok(()))
}

fn with_timer(
    action: &str,
    f: impl FnOnce(&mut HostTimer) -> Result<bool, EngineError>,
) -> TimerSnapshot {
    let mut slot = TIMER.lock().unwrap_or_else(PoisonError::into_inner);
    let timer = slot.get_or_insert_with(|| {
        CountdownTimer::new(
            SystemClock,
            RecordingGateway::new(),
            ManualTicks::new(),
            SilentAlert,
        )
    });
    let outcome = f(timer);
    let commands = timer
        .gateway()
        .take_commands()
        .into_iter()
        .map(to_notification_command)
        .collect();
    let (ok, just_finished, message) = match outcome {
        Ok(just_finished) => (true, just_finished, String::new()),
        Err(err) => {
            info!("event=timer_ffi module=ffi status=rejected action={action} error={err}");
            (false, false, format!("timer_{action} failed: {err}"))
        }
    };
    let alert_ringing = timer.alert_active();
    TimerSnapshot {
        ok,
        state: timer.state().as_str().to_string(),
        remaining_seconds: timer.remaining_seconds(),
        display_text: format_timer_display(timer.remaining_seconds()),
        progress: timer.progress(),
        just_finished,
        alert_ringing,
        vibration_pattern_ms: if alert_ringing && timer.vibrates() {
            AlertKind::Timer.vibration_pattern_ms().to_vec()
        } else {
            Vec::new()
        },
        tick_interval_ms: timer.ticks().active_interval().map(duration_ms),
        commands,
        message,
    }
}

fn with_stopwatch(
    action: &str,
    f: impl FnOnce(&mut HostStopwatch) -> Result<(), EngineError>,
) -> StopwatchSnapshot {
    let mut slot = STOPWATCH.lock().unwrap_or_else(PoisonError::into_inner);
    let stopwatch = slot.get_or_insert_with(|| Stopwatch::new(SystemClock, ManualTicks::new()));
    let (ok, message) = match f(stopwatch) {
        Ok(()) => (true, String::new()),
        Err(err) => {
            info!("event=stopwatch_ffi module=ffi status=rejected action={action} error={err}");
            (false, format!("stopwatch_{action} failed: {err}"))
        }
    };
    let elapsed_ms = stopwatch.elapsed_ms();
    let laps = stopwatch
        .laps()
        .iter()
        .map(|lap| LapItem {
            number: u64::try_from(lap.number).unwrap_or(u64::MAX),
            lap_time_ms: lap.lap_time_ms,
            total_time_ms: lap.total_time_ms,
            lap_text: format_stopwatch_time(lap.lap_time_ms),
            total_text: format_stopwatch_time(lap.total_time_ms),
            mark: match stopwatch.lap_mark(lap) {
                LapMark::Best => "best",
                LapMark::Worst => "worst",
                LapMark::Plain => "",
            }
            .to_string(),
        })
        .collect();
    StopwatchSnapshot {
        ok,
        state: stopwatch.state().as_str().to_string(),
        elapsed_ms,
        display_text: format_stopwatch_time(elapsed_ms),
        laps,
        tick_interval_ms: stopwatch.ticks().active_interval().map(duration_ms),
        message,
    }
}

fn duration_ms(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("CLOCKKIT_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
        })
        .clone()
}

fn with_alarm_service<T>(
    scheduled_ids: Vec<String>,
    f: impl FnOnce(&mut EntryAlarmService<'_, '_>) -> AlarmStoreResult<T>,
) -> Result<(T, Vec<NotificationCommand>), String> {
    let _guard = ENTRY_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db(resolve_entry_db_path())
        .map_err(|err| format!("entry DB open failed: {err}"))?;
    let gateway = RecordingGateway::new();
    gateway.assume_scheduled(scheduled_ids);
    let mut service = AlarmService::new(
        AlarmStore::open(SqliteKeyValueStore::new(&conn), SystemClock),
        AlarmScheduler::new(&gateway, SystemClock),
    );
    let value = f(&mut service).map_err(|err| err.to_string())?;
    let commands = gateway
        .take_commands()
        .into_iter()
        .map(to_notification_command)
        .collect();
    Ok((value, commands))
}

fn with_world_clock_store<T>(
    f: impl FnOnce(&mut WorldClockStore<SqliteKeyValueStore<'_>>) -> T,
) -> Result<T, String> {
    let _guard = ENTRY_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db(resolve_entry_db_path())
        .map_err(|err| format!("entry DB open failed: {err}"))?;
    let mut store = WorldClockStore::open(SqliteKeyValueStore::new(&conn));
    Ok(f(&mut store))
}

fn world_clock_response(
    ok: bool,
    changed: bool,
    message: impl Into<String>,
) -> WorldClockActionResponse {
    WorldClockActionResponse {
        ok,
        changed,
        message: message.into(),
    }
}

fn to_draft(input: &AlarmInput) -> Result<AlarmDraft, String> {
    let mut draft = AlarmDraft::new(input.hour, input.minute)
        .with_label(input.label.trim())
        .with_auto_delete(input.auto_delete);
    for key in &input.repeat_days {
        let day = Weekday::parse(key.trim().to_ascii_lowercase().as_str())
            .ok_or_else(|| format!("unknown repeat day `{key}`"))?;
        draft.repeat_days.insert(day);
    }
    let sound_id = input.sound_id.trim();
    draft.sound_id = if sound_id.is_empty() {
        AlarmSound::Default
    } else {
        AlarmSound::parse(sound_id).ok_or_else(|| format!("unknown sound `{sound_id}`"))?
    };
    draft.vibrate = input.vibrate;
    draft.validate().map_err(|err| err.to_string())?;
    Ok(draft)
}

fn to_alarm_item(alarm: &Alarm, use_24_hour: bool) -> AlarmItem {
    AlarmItem {
        id: alarm.id.clone(),
        hour: alarm.hour,
        minute: alarm.minute,
        label: alarm.label.clone(),
        repeat_days: alarm
            .repeat_days
            .iter()
            .map(|day| day.key().to_string())
            .collect(),
        sound_id: alarm.sound_id.id().to_string(),
        vibrate: alarm.vibrate,
        auto_delete: alarm.auto_delete,
        enabled: alarm.enabled,
        time_text: format_alarm_time(alarm.hour, alarm.minute, use_24_hour),
        repeat_text: repeat_text(&alarm.repeat_days),
    }
}

fn to_notification_command(command: GatewayCommand) -> NotificationCommand {
    let empty = NotificationCommand {
        action: String::new(),
        id: String::new(),
        when_epoch_ms: None,
        weekday: None,
        hour: None,
        minute: None,
        title: None,
        body: None,
        channel_id: None,
        alarm_id: None,
    };
    match command {
        GatewayCommand::ScheduleOneShot {
            id,
            when_epoch_ms,
            payload,
        } => with_payload(
            NotificationCommand {
                action: "schedule_once".to_string(),
                id,
                when_epoch_ms: Some(when_epoch_ms),
                ..empty
            },
            payload,
        ),
        GatewayCommand::ScheduleWeekly {
            id,
            weekday,
            hour,
            minute,
            payload,
        } => with_payload(
            NotificationCommand {
                action: "schedule_weekly".to_string(),
                id,
                weekday: Some(weekday),
                hour: Some(hour),
                minute: Some(minute),
                ..empty
            },
            payload,
        ),
        GatewayCommand::Cancel { id } => NotificationCommand {
            action: "cancel".to_string(),
            id,
            ..empty
        },
    }
}

fn with_payload(command: NotificationCommand, payload: NotificationPayload) -> NotificationCommand {
    NotificationCommand {
        channel_id: Some(payload.category.channel_id().to_string()),
        title: Some(payload.title),
        body: Some(payload.body),
        alarm_id: payload.alarm_id,
        ..command
    }
}
