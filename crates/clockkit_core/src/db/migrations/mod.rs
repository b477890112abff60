//! Schema steps for the `kv_entries` table.
//!
//! Step `n` of `STEPS` brings the schema to version `n + 1`. Steps only ever
//! get appended.
//!
//! - `1` `kv_init`: one row per collection key, value stored as JSON text.
//! - `2` `kv_touch`: the schema stamps `updated_at` whenever a value changes,
//!   so writers only upsert `(key, value)`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Table backing `SqliteKeyValueStore`.
pub const KV_TABLE: &str = "kv_entries";

/// Columns `SqliteKeyValueStore` depends on.
pub const KV_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

const STEPS: &[(&str, &str)] = &[
    ("kv_init", include_str!("0001_init.sql")),
    ("kv_touch", include_str!("0002_kv_touch.sql")),
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    STEPS.len() as u32
}

/// Runs every pending step in one transaction, then checks the column contract.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    if found < supported {
        let tx = conn.transaction()?;
        for (version, (name, sql)) in (1u32..).zip(STEPS).skip(found as usize) {
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", version)?;
            info!(
                "event=db_migrate module=db status=ok version={} step={}",
                version, name
            );
        }
        tx.commit()?;
    }

    check_kv_contract(conn)
}

fn check_kv_contract(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([KV_TABLE], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    match KV_COLUMNS
        .into_iter()
        .find(|column| !present.iter().any(|name| name == column))
    {
        Some(missing_column) => Err(DbError::KvContract { missing_column }),
        None => Ok(()),
    }
}
