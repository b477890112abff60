//! Notification gateway contract.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// External notification scheduler failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The scheduler refused one request (bad trigger, quota, permission).
    Rejected { id: String, reason: String },
    /// The scheduler could not be reached at all.
    Unavailable(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { id, reason } => {
                write!(f, "notification `{id}` rejected: {reason}")
            }
            Self::Unavailable(reason) => write!(f, "notification scheduler unavailable: {reason}"),
        }
    }
}

impl Error for GatewayError {}

/// Which handler receives a fired notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Alarm,
    Timer,
}

impl NotificationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alarm => "alarm",
            Self::Timer => "timer",
        }
    }

    /// Platform channel the notification is posted on.
    pub fn channel_id(self) -> &'static str {
        match self {
            Self::Alarm => "alarms",
            Self::Timer => "timers",
        }
    }
}

/// Content and routing data attached to one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub category: NotificationCategory,
    /// Set for alarm notifications so the handler can find the alarm.
    pub alarm_id: Option<String>,
}

impl NotificationPayload {
    pub fn alarm(alarm_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: "⏰ Alarm".to_string(),
            body: body.into(),
            category: NotificationCategory::Alarm,
            alarm_id: Some(alarm_id.into()),
        }
    }

    pub fn timer_finished() -> Self {
        Self {
            title: "⏳ Timer Finished".to_string(),
            body: "Your timer has completed!".to_string(),
            category: NotificationCategory::Timer,
            alarm_id: None,
        }
    }
}

/// Capability over the platform notification scheduler.
///
/// `weekday` uses the scheduler's ordinal convention: Sunday = 1 ... Saturday = 7.
pub trait NotificationGateway {
    fn schedule_one_shot(
        &self,
        id: &str,
        when_epoch_ms: i64,
        payload: &NotificationPayload,
    ) -> GatewayResult<()>;

    fn schedule_weekly(
        &self,
        id: &str,
        weekday: u8,
        hour: u32,
        minute: u32,
        payload: &NotificationPayload,
    ) -> GatewayResult<()>;

    fn cancel(&self, id: &str) -> GatewayResult<()>;

    fn list_scheduled(&self) -> GatewayResult<Vec<String>>;
}

impl<G: NotificationGateway + ?Sized> NotificationGateway for &G {
    fn schedule_one_shot(
        &self,
        id: &str,
        when_epoch_ms: i64,
        payload: &NotificationPayload,
    ) -> GatewayResult<()> {
        (**self).schedule_one_shot(id, when_epoch_ms, payload)
    }

    fn schedule_weekly(
        &self,
        id: &str,
        weekday: u8,
        hour: u32,
        minute: u32,
        payload: &NotificationPayload,
    ) -> GatewayResult<()> {
        (**self).schedule_weekly(id, weekday, hour, minute, payload)
    }

    fn cancel(&self, id: &str) -> GatewayResult<()> {
        (**self).cancel(id)
    }

    fn list_scheduled(&self) -> GatewayResult<Vec<String>> {
        (**self).list_scheduled()
    }
}

impl<G: NotificationGateway + ?Sized> NotificationGateway for Rc<G> {
    fn schedule_one_shot(
        &self,
        id: &str,
        when_epoch_ms: i64,
        payload: &NotificationPayload,
    ) -> GatewayResult<()> {
        (**self).schedule_one_shot(id, when_epoch_ms, payload)
    }

    fn schedule_weekly(
        &self,
        id: &str,
        weekday: u8,
        hour: u32,
        minute: u32,
        payload: &NotificationPayload,
    ) -> GatewayResult<()> {
        (**self).schedule_weekly(id, weekday, hour, minute, payload)
    }

    fn cancel(&self, id: &str) -> GatewayResult<()> {
        (**self).cancel(id)
    }

    fn list_scheduled(&self) -> GatewayResult<Vec<String>> {
        (**self).list_scheduled()
    }
}
