//! World clock list store.
//!
//! # Invariants
//! - At most one entry per timezone; adding a present timezone is a no-op.
//! - Persistence failures are logged and swallowed like the alarm store.

use crate::format::zone::{resolve_zone, TimeZoneError};
use crate::model::world_clock::WorldClockEntry;
use crate::repo::collection::{load_list, save_list, WORLD_CLOCKS_KEY};
use crate::repo::kv_store::KeyValueStore;
use log::{error, info, warn};

pub struct WorldClockStore<S: KeyValueStore> {
    kv: S,
    entries: Vec<WorldClockEntry>,
}

impl<S: KeyValueStore> WorldClockStore<S> {
    pub fn open(kv: S) -> Self {
        let entries = match load_list::<WorldClockEntry, _>(&kv, WORLD_CLOCKS_KEY) {
            Ok(mut entries) => {
                let mut seen = Vec::<String>::new();
                entries.retain(|entry| {
                    if seen.contains(&entry.timezone) {
                        false
                    } else {
                        seen.push(entry.timezone.clone());
                        true
                    }
                });
                entries
            }
            Err(err) => {
                error!(
                    "event=world_clock_load module=world_clock status=error error={}",
                    err
                );
                Vec::new()
            }
        };
        Self { kv, entries }
    }

    /// Entries in the order they were added.
    pub fn list(&self) -> &[WorldClockEntry] {
        &self.entries
    }

    pub fn contains(&self, timezone: &str) -> bool {
        self.entries.iter().any(|entry| entry.timezone == timezone)
    }

    /// Appends `entry` unless its timezone is already listed.
    ///
    /// Returns whether the list changed.
    pub fn add(&mut self, entry: WorldClockEntry) -> Result<bool, TimeZoneError> {
        resolve_zone(&entry.timezone)?;
        if self.contains(&entry.timezone) {
            info!(
                "event=world_clock_add module=world_clock status=skip timezone={}",
                entry.timezone
            );
            return Ok(false);
        }
        info!(
            "event=world_clock_add module=world_clock status=ok timezone={}",
            entry.timezone
        );
        self.entries.push(entry);
        self.persist();
        Ok(true)
    }

    /// Removes the entry for `timezone`; a missing timezone is a no-op.
    pub fn remove(&mut self, timezone: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.timezone != timezone);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        info!(
            "event=world_clock_remove module=world_clock status={} timezone={}",
            if removed { "ok" } else { "skip" },
            timezone
        );
        removed
    }

    fn persist(&self) {
        if let Err(err) = save_list(&self.kv, WORLD_CLOCKS_KEY, &self.entries) {
            warn!(
                "event=world_clock_persist module=world_clock status=error count={} error={}",
                self.entries.len(),
                err
            );
        }
    }
}
