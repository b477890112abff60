//! SQLite bootstrap for the durable key-value store.
//!
//! # Responsibility
//! - Open connections that are ready for `SqliteKeyValueStore`.
//! - Bring the `kv_entries` schema up to date and check its column contract.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`, one step per migration.
//! - A connection is only handed out after the contract check passes.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the key-value database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; nothing was touched.
    SchemaTooNew { found: u32, supported: u32 },
    /// `kv_entries` exists but lacks a column the store reads or writes.
    KvContract { missing_column: &'static str },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "store schema v{found} was written by a newer build (this build reads up to v{supported})"
            ),
            Self::KvContract { missing_column } => {
                write!(f, "kv_entries is missing column `{missing_column}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
