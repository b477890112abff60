//! JSON list persistence on top of `KeyValueStore`.

use crate::repo::kv_store::{KeyValueStore, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage key of the alarm list.
pub const ALARMS_KEY: &str = "@clock_app_alarms";
/// Storage key of the world clock list.
pub const WORLD_CLOCKS_KEY: &str = "@clock_app_world_clocks";

/// Reads a JSON array stored under `key`; a missing key is an empty list.
pub fn load_list<T, S>(store: &S, key: &str) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Serializes `items` and writes them under `key` in one `set`.
pub fn save_list<T, S>(store: &S, key: &str, items: &[T]) -> StoreResult<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(items)?;
    store.set(key, &raw)
}
