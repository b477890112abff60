//! Core use-case services.
//!
//! # Responsibility
//! - Own the canonical alarm and world clock lists.
//! - Keep notification registrations in sync with the alarm list.
//!
//! Data flow: UI action -> `AlarmStore` (persist) -> `AlarmScheduler`
//! (register with the notification gateway).

pub mod alarm_scheduler;
pub mod alarm_service;
pub mod alarm_store;
pub mod world_clock_store;
