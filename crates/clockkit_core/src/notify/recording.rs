//! In-process gateway that keeps the live registration set and a command log.
//!
//! Hosts whose notification API lives outside Rust seed the ids the platform
//! already holds with `assume_scheduled`, run a use-case, then replay
//! `take_commands()` against the platform.

use crate::notify::gateway::{GatewayError, GatewayResult, NotificationGateway, NotificationPayload};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// One live registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    OneShot {
        when_epoch_ms: i64,
        payload: NotificationPayload,
    },
    Weekly {
        weekday: u8,
        hour: u32,
        minute: u32,
        payload: NotificationPayload,
    },
    /// Registered outside this process; content unknown.
    External,
}

/// One request issued through the gateway, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCommand {
    ScheduleOneShot {
        id: String,
        when_epoch_ms: i64,
        payload: NotificationPayload,
    },
    ScheduleWeekly {
        id: String,
        weekday: u8,
        hour: u32,
        minute: u32,
        payload: NotificationPayload,
    },
    Cancel {
        id: String,
    },
}

#[derive(Debug, Default)]
pub struct RecordingGateway {
    registrations: RefCell<BTreeMap<String, Registration>>,
    commands: RefCell<Vec<GatewayCommand>>,
    failing: Cell<bool>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks ids as already registered by the platform.
    pub fn assume_scheduled<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registrations = self.registrations.borrow_mut();
        for id in ids {
            registrations.insert(id.into(), Registration::External);
        }
    }

    /// Makes every subsequent call fail with `GatewayError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn registrations(&self) -> BTreeMap<String, Registration> {
        self.registrations.borrow().clone()
    }

    pub fn registration(&self, id: &str) -> Option<Registration> {
        self.registrations.borrow().get(id).cloned()
    }

    pub fn registered_ids(&self) -> Vec<String> {
        self.registrations.borrow().keys().cloned().collect()
    }

    pub fn commands(&self) -> Vec<GatewayCommand> {
        self.commands.borrow().clone()
    }

    /// Drains the command log.
    pub fn take_commands(&self) -> Vec<GatewayCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    fn check_available(&self) -> GatewayResult<()> {
        if self.failing.get() {
            return Err(GatewayError::Unavailable(
                "recording gateway set to fail".to_string(),
            ));
        }
        Ok(())
    }
}

impl NotificationGateway for RecordingGateway {
    fn schedule_one_shot(
        &self,
        id: &str,
        when_epoch_ms: i64,
        payload: &NotificationPayload,
    ) -> GatewayResult<()> {
        self.check_available()?;
        self.registrations.borrow_mut().insert(
            id.to_string(),
            Registration::OneShot {
                when_epoch_ms,
                payload: payload.clone(),
            },
        );
        self.commands.borrow_mut().push(GatewayCommand::ScheduleOneShot {
            id: id.to_string(),
            when_epoch_ms,
            payload: payload.clone(),
        });
        Ok(())
    }

    fn schedule_weekly(
        &self,
        id: &str,
        weekday: u8,
        hour: u32,
        minute: u32,
        payload: &NotificationPayload,
    ) -> GatewayResult<()> {
        self.check_available()?;
        if !(1..=7).contains(&weekday) {
            return Err(GatewayError::Rejected {
                id: id.to_string(),
                reason: format!("weekday ordinal {weekday} outside 1..=7"),
            });
        }
        self.registrations.borrow_mut().insert(
            id.to_string(),
            Registration::Weekly {
                weekday,
                hour,
                minute,
                payload: payload.clone(),
            },
        );
        self.commands.borrow_mut().push(GatewayCommand::ScheduleWeekly {
            id: id.to_string(),
            weekday,
            hour,
            minute,
            payload: payload.clone(),
        });
        Ok(())
    }

    fn cancel(&self, id: &str) -> GatewayResult<()> {
        self.check_available()?;
        self.registrations.borrow_mut().remove(id);
        self.commands
            .borrow_mut()
            .push(GatewayCommand::Cancel { id: id.to_string() });
        Ok(())
    }

    fn list_scheduled(&self) -> GatewayResult<Vec<String>> {
        self.check_available()?;
        Ok(self.registered_ids())
    }
}

#[cfg(test)]
mod tests {
    use super::{GatewayCommand, RecordingGateway, Registration};
    use crate::notify::gateway::{NotificationGateway, NotificationPayload};

    #[test]
    fn schedule_replaces_existing_registration_with_same_id() {
        let gateway = RecordingGateway::new();
        let payload = NotificationPayload::timer_finished();
        gateway.schedule_one_shot("t", 1_000, &payload).expect("first");
        gateway.schedule_one_shot("t", 2_000, &payload).expect("second");

        assert_eq!(gateway.registered_ids(), vec!["t".to_string()]);
        assert!(matches!(
            gateway.registration("t"),
            Some(Registration::OneShot {
                when_epoch_ms: 2_000,
                ..
            })
        ));
        assert_eq!(gateway.take_commands().len(), 2);
        assert!(gateway.commands().is_empty());
    }

    #[test]
    fn weekly_rejects_out_of_range_ordinal() {
        let gateway = RecordingGateway::new();
        let payload = NotificationPayload::alarm("a", "wake");
        assert!(gateway.schedule_weekly("a_sun", 0, 7, 0, &payload).is_err());
        assert!(gateway.registrations().is_empty());
    }

    #[test]
    fn assumed_ids_are_listed_and_cancellable() {
        let gateway = RecordingGateway::new();
        gateway.assume_scheduled(["alarm_1_mon"]);
        assert_eq!(
            gateway.list_scheduled().expect("list"),
            vec!["alarm_1_mon".to_string()]
        );
        gateway.cancel("alarm_1_mon").expect("cancel");
        assert!(gateway.registered_ids().is_empty());
        assert_eq!(
            gateway.commands(),
            vec![GatewayCommand::Cancel {
                id: "alarm_1_mon".to_string()
            }]
        );
    }
}
