//! Domain model for alarms and world clocks.
//!
//! # Responsibility
//! - Define canonical data structures persisted by the stores.
//! - Keep validation next to the data it protects.
//!
//! # Invariants
//! - Every alarm is identified by a stable `AlarmId`.
//! - World clock entries are keyed by IANA timezone id.

pub mod alarm;
pub mod world_clock;
