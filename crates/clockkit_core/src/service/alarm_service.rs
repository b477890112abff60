//! Alarm use-case service.
//!
//! # Responsibility
//! - Run UI actions as store mutation followed by scheduler side effect.
//! - Reconcile gateway registrations with the persisted alarm set.
//!
//! # Invariants
//! - The store write happens regardless of scheduling outcome.
//! - Disabled alarms have no registrations after any service call touching them.

use crate::engine::clock::Clock;
use crate::engine::timer::TIMER_NOTIFICATION_ID;
use crate::model::alarm::{Alarm, AlarmDraft};
use crate::notify::gateway::NotificationGateway;
use crate::repo::kv_store::KeyValueStore;
use crate::service::alarm_scheduler::{is_registration_of, AlarmScheduler};
use crate::service::alarm_store::{AlarmStore, AlarmStoreError, AlarmStoreResult};
use chrono::TimeZone;
use log::info;

/// What happened to an alarm after its notification fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiredOutcome {
    /// One-shot with auto-delete: removed from the store.
    Deleted(Alarm),
    /// One-shot without auto-delete: kept but switched off.
    Disabled(Alarm),
    /// Repeating alarm: unchanged, its weekly triggers keep cycling.
    Repeating(Alarm),
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResyncReport {
    pub scheduled: usize,
    pub disabled: usize,
    pub orphans_cancelled: usize,
}

pub struct AlarmService<S, C, G, Z>
where
    S: KeyValueStore,
    C: Clock,
    G: NotificationGateway,
    Z: TimeZone,
{
    store: AlarmStore<S, C>,
    scheduler: AlarmScheduler<G, C, Z>,
}

impl<S, C, G, Z> AlarmService<S, C, G, Z>
where
    S: KeyValueStore,
    C: Clock,
    G: NotificationGateway,
    Z: TimeZone,
{
    pub fn new(store: AlarmStore<S, C>, scheduler: AlarmScheduler<G, C, Z>) -> Self {
        Self { store, scheduler }
    }

    pub fn store(&self) -> &AlarmStore<S, C> {
        &self.store
    }

    pub fn scheduler(&self) -> &AlarmScheduler<G, C, Z> {
        &self.scheduler
    }

    pub fn list(&self) -> Vec<Alarm> {
        self.store.list()
    }

    pub fn get(&self, id: &str) -> Option<&Alarm> {
        self.store.get(id)
    }

    /// Saves an editor draft: creates when `editing_id` is `None`, otherwise
    /// updates that alarm. The saved alarm is enabled and (re)scheduled.
    pub fn save(&mut self, draft: &AlarmDraft, editing_id: Option<&str>) -> AlarmStoreResult<Alarm> {
        let alarm = match editing_id {
            Some(id) => self.store.update(id, draft)?,
            None => self.store.create(draft)?,
        };
        self.scheduler.schedule(&alarm);
        Ok(alarm)
    }

    /// Cancels the alarm's registrations, then removes it.
    pub fn delete(&mut self, id: &str) -> AlarmStoreResult<Alarm> {
        if !self.store.contains(id) {
            return Err(AlarmStoreError::NotFound(id.to_string()));
        }
        self.scheduler.cancel(id);
        self.store.delete(id)
    }

    /// Flips `enabled`; turning on schedules, turning off cancels.
    pub fn toggle(&mut self, id: &str) -> AlarmStoreResult<Alarm> {
        let enabled = self
            .store
            .get(id)
            .map(|alarm| alarm.enabled)
            .ok_or_else(|| AlarmStoreError::NotFound(id.to_string()))?;
        self.set_enabled(id, !enabled)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> AlarmStoreResult<Alarm> {
        let alarm = self.store.set_enabled(id, enabled)?;
        if alarm.enabled {
            self.scheduler.schedule(&alarm);
        } else {
            self.scheduler.cancel(&alarm.id);
        }
        Ok(alarm)
    }

    /// Applies post-firing rules for the alarm a notification was routed to.
    pub fn handle_fired(&mut self, id: &str) -> AlarmStoreResult<FiredOutcome> {
        let alarm = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| AlarmStoreError::NotFound(id.to_string()))?;

        let outcome = if alarm.deletes_after_firing() {
            self.scheduler.cancel(id);
            FiredOutcome::Deleted(self.store.delete(id)?)
        } else if alarm.is_one_shot() {
            self.scheduler.cancel(id);
            FiredOutcome::Disabled(self.store.set_enabled(id, false)?)
        } else {
            FiredOutcome::Repeating(alarm)
        };
        info!(
            "event=alarm_fired module=alarm_service status=ok alarm_id={} outcome={}",
            id,
            match outcome {
                FiredOutcome::Deleted(_) => "deleted",
                FiredOutcome::Disabled(_) => "disabled",
                FiredOutcome::Repeating(_) => "repeating",
            }
        );
        Ok(outcome)
    }

    /// Brings gateway registrations in line with the store: every enabled
    /// alarm is rescheduled, disabled ones are cancelled, and registrations
    /// whose alarm no longer exists are withdrawn.
    pub fn resync(&mut self) -> ResyncReport {
        let mut report = ResyncReport::default();
        let alarms = self.store.list();
        for alarm in &alarms {
            if alarm.enabled {
                self.scheduler.schedule(alarm);
                report.scheduled += 1;
            } else {
                self.scheduler.cancel(&alarm.id);
                report.disabled += 1;
            }
        }

        for registration_id in self.scheduler.scheduled_ids() {
            if registration_id == TIMER_NOTIFICATION_ID {
                continue;
            }
            if alarms
                .iter()
                .any(|alarm| is_registration_of(&registration_id, &alarm.id))
            {
                continue;
            }
            if self.scheduler.cancel_registration(&registration_id) {
                report.orphans_cancelled += 1;
            }
        }

        info!(
            "event=alarm_resync module=alarm_service status=ok scheduled={} disabled={} orphans_cancelled={}",
            report.scheduled, report.disabled, report.orphans_cancelled
        );
        report
    }
}
