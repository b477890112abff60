//! Durable key-value persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the `get`/`set` contract the stores persist through.
//! - Isolate SQLite details from the alarm and world clock stores.
//!
//! # Invariants
//! - `set` replaces the whole value under a key in one write.
//! - Values are read back verbatim.

pub mod collection;
pub mod kv_store;
