// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistent Storage Module
//!
//! A small key-value store holding per-install state: the generated user id
//! and the registered phone number. SQLite backs it on devices; an in-memory
//! map backs it in tests and ephemeral sessions.

mod error;
mod memory;
mod migration;

pub use error::StorageError;
pub use memory::MemoryStore;

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value persistence used by the identity resolver.
///
/// Implementations must be safe to share between sessions. `set_if_absent`
/// is the compare-and-set primitive: concurrent first-run callers must all
/// observe the same winning value.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value. Returns `None` if the key is not set.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any existing one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Writes `value` only if `key` is unset and returns the stored value.
    ///
    /// The default implementation is a plain read-then-write and is not
    /// atomic; stores shared between threads override it.
    fn set_if_absent(&self, key: &str, value: &str) -> Result<String, StorageError> {
        if let Some(existing) = self.get(key)? {
            return Ok(existing);
        }
        self.set(key, value)?;
        Ok(value.to_string())
    }
}

/// SQLite-based key-value store.
///
/// rusqlite's `Connection` is not `Sync`, so it lives behind a mutex. Each
/// operation holds the lock for its whole statement sequence, which makes
/// `set_if_absent` atomic for every user of the same store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Creates an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        migration::migrate(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Returns the current schema version.
    pub fn schema_version(&self) -> Result<u32, StorageError> {
        migration::schema_version(&self.conn.lock())
    }
}

fn now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM key_value WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO key_value (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now_secs()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM key_value WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn set_if_absent(&self, key: &str, value: &str) -> Result<String, StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR IGNORE INTO key_value (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now_secs()],
        )?;
        let stored = conn.query_row(
            "SELECT value FROM key_value WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )?;
        Ok(stored)
    }
}
