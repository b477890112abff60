//! Pure display and recurrence helpers.
//!
//! Nothing in this module reads the clock; callers pass the instant.

pub mod display;
pub mod recurrence;
pub mod zone;
