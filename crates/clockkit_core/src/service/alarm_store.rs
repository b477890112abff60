//! Alarm store: the canonical in-memory alarm list and its durable mirror.
//!
//! # Responsibility
//! - Own the alarm list; nothing else mutates it.
//! - Persist the full list after every mutation.
//!
//! # Invariants
//! - Ids are unique within the store.
//! - `update` preserves `id` and `created_at`.
//! - A failed persist is logged and swallowed: the in-memory list still
//!   reflects the mutation, and a restart may lose it.

use crate::engine::clock::Clock;
use crate::model::alarm::{Alarm, AlarmDraft, AlarmId, AlarmValidationError};
use crate::repo::collection::{load_list, save_list, ALARMS_KEY};
use crate::repo::kv_store::KeyValueStore;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ALARM_ID_PREFIX: &str = "alarm_";

/// Errors surfaced to the caller for corrective action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmStoreError {
    Validation(AlarmValidationError),
    NotFound(AlarmId),
}

impl Display for AlarmStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "alarm not found: {id}"),
        }
    }
}

impl Error for AlarmStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<AlarmValidationError> for AlarmStoreError {
    fn from(value: AlarmValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type AlarmStoreResult<T> = Result<T, AlarmStoreError>;

pub struct AlarmStore<S: KeyValueStore, C: Clock> {
    kv: S,
    clock: C,
    /// Insertion order; `list()` sorts a copy.
    alarms: Vec<Alarm>,
}

impl<S: KeyValueStore, C: Clock> AlarmStore<S, C> {
    /// Loads the persisted list. Unreadable or corrupt data starts an empty store.
    pub fn open(kv: S, clock: C) -> Self {
        let alarms = match load_list::<Alarm, _>(&kv, ALARMS_KEY) {
            Ok(alarms) => {
                info!(
                    "event=alarm_store_load module=alarm_store status=ok count={}",
                    alarms.len()
                );
                dedupe_ids(alarms)
            }
            Err(err) => {
                error!(
                    "event=alarm_store_load module=alarm_store status=error error={}",
                    err
                );
                Vec::new()
            }
        };
        Self { kv, clock, alarms }
    }

    /// Alarms sorted by time of day; equal times keep insertion order.
    pub fn list(&self) -> Vec<Alarm> {
        let mut sorted = self.alarms.clone();
        sorted.sort_by_key(Alarm::minute_of_day);
        sorted
    }

    pub fn get(&self, id: &str) -> Option<&Alarm> {
        self.alarms.iter().find(|alarm| alarm.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Creates an enabled alarm with a fresh id minted from the current time.
    pub fn create(&mut self, draft: &AlarmDraft) -> AlarmStoreResult<Alarm> {
        draft.validate()?;
        let id = self.mint_id();
        let alarm = Alarm::from_draft(id, draft, self.clock.now())?;
        self.alarms.push(alarm.clone());
        self.persist("create");
        info!(
            "event=alarm_create module=alarm_store status=ok alarm_id={} repeat_days={}",
            alarm.id,
            alarm.repeat_days.len()
        );
        Ok(alarm)
    }

    /// Replaces editable fields of an existing alarm.
    pub fn update(&mut self, id: &str, draft: &AlarmDraft) -> AlarmStoreResult<Alarm> {
        draft.validate()?;
        let alarm = self.find_mut(id)?;
        alarm.apply_draft(draft)?;
        let updated = alarm.clone();
        self.persist("update");
        info!(
            "event=alarm_update module=alarm_store status=ok alarm_id={}",
            updated.id
        );
        Ok(updated)
    }

    /// Removes an alarm. A missing id is an error, not a no-op.
    pub fn delete(&mut self, id: &str) -> AlarmStoreResult<Alarm> {
        let index = self
            .alarms
            .iter()
            .position(|alarm| alarm.id == id)
            .ok_or_else(|| AlarmStoreError::NotFound(id.to_string()))?;
        let removed = self.alarms.remove(index);
        self.persist("delete");
        info!(
            "event=alarm_delete module=alarm_store status=ok alarm_id={}",
            removed.id
        );
        Ok(removed)
    }

    /// Sets `enabled` without touching any other field.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> AlarmStoreResult<Alarm> {
        let alarm = self.find_mut(id)?;
        alarm.enabled = enabled;
        let updated = alarm.clone();
        self.persist("set_enabled");
        info!(
            "event=alarm_set_enabled module=alarm_store status=ok alarm_id={} enabled={}",
            updated.id, enabled
        );
        Ok(updated)
    }

    fn find_mut(&mut self, id: &str) -> AlarmStoreResult<&mut Alarm> {
        self.alarms
            .iter_mut()
            .find(|alarm| alarm.id == id)
            .ok_or_else(|| AlarmStoreError::NotFound(id.to_string()))
    }

    fn mint_id(&self) -> AlarmId {
        let mut stamp = self.clock.now_ms();
        loop {
            let candidate = format!("{ALARM_ID_PREFIX}{stamp}");
            if !self.contains(&candidate) {
                return candidate;
            }
            stamp = stamp.saturating_add(1);
        }
    }

    fn persist(&self, action: &str) {
        if let Err(err) = save_list(&self.kv, ALARMS_KEY, &self.alarms) {
            warn!(
                "event=alarm_store_persist module=alarm_store status=error action={} count={} error={}",
                action,
                self.alarms.len(),
                err
            );
        }
    }
}

/// Drops later records that reuse an earlier id.
fn dedupe_ids(alarms: Vec<Alarm>) -> Vec<Alarm> {
    let total = alarms.len();
    let mut kept: Vec<Alarm> = Vec::with_capacity(total);
    for alarm in alarms {
        if !kept.iter().any(|existing| existing.id == alarm.id) {
            kept.push(alarm);
        }
    }
    if kept.len() != total {
        warn!(
            "event=alarm_store_load module=alarm_store status=repaired dropped_duplicates={}",
            total - kept.len()
        );
    }
    kept
}
