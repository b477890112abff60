//! Core scheduling and elapsed-time engine for ClockKit.
//! This crate owns alarm persistence, notification scheduling, and the
//! countdown/stopwatch state machines; hosts only render and forward ticks.

pub mod db;
pub mod engine;
pub mod format;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod settings;

pub use engine::alert::{AlertHandle, AlertKind, AlertOutput, RecordingAlert, SilentAlert};
pub use engine::clock::{Clock, ManualClock, SystemClock};
pub use engine::stopwatch::{Lap, LapMark, Stopwatch, StopwatchState};
pub use engine::tick::{ManualTicks, TickSource};
pub use engine::timer::{CountdownTimer, TimerField, TimerInput, TimerState, TimerTick};
pub use engine::EngineError;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::alarm::{
    Alarm, AlarmDraft, AlarmId, AlarmSound, AlarmValidationError, Weekday,
};
pub use model::world_clock::{search_catalog, CatalogCity, WorldClockEntry, CITY_CATALOG};
pub use notify::{GatewayCommand, NotificationGateway, NotificationPayload, RecordingGateway};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use service::alarm_scheduler::AlarmScheduler;
pub use service::alarm_service::{AlarmService, FiredOutcome, ResyncReport};
pub use service::alarm_store::{AlarmStore, AlarmStoreError, AlarmStoreResult};
pub use service::world_clock_store::WorldClockStore;
pub use settings::DisplaySettings;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
