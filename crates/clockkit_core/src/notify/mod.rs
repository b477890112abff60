//! Notification scheduling capability.
//!
//! # Responsibility
//! - Define the `NotificationGateway` capability the alarm scheduler and the
//!   countdown timer register triggers through.
//! - Provide an in-process recording gateway for tests and for hosts that
//!   replay the recorded commands against the platform scheduler.
//!
//! # Invariants
//! - Registration identifiers form one flat namespace; alarm registrations use
//!   `{alarm_id}` or `{alarm_id}_{day}`.

pub mod gateway;
pub mod recording;

pub use gateway::{
    GatewayError, GatewayResult, NotificationCategory, NotificationGateway, NotificationPayload,
};
pub use recording::{GatewayCommand, RecordingGateway, Registration};
