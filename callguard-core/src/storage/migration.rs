//! Schema migrations for the key-value database.
//!
//! Entry `n` of [`MIGRATIONS`] moves the schema to version `n + 1`. The
//! applied version is kept in SQLite's `user_version` header field.

use rusqlite::Connection;

use super::StorageError;

/// Schema steps, oldest first. Never edit a released step; append a new one.
pub(crate) const MIGRATIONS: &[&str] = &["CREATE TABLE IF NOT EXISTS key_value (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    );"];

/// Brings the schema up to date.
pub(crate) fn migrate(conn: &Connection) -> Result<(), StorageError> {
    apply(conn, MIGRATIONS)
}

/// Applies the steps past the stored version in one transaction.
fn apply(conn: &Connection, steps: &[&str]) -> Result<(), StorageError> {
    let current = schema_version(conn)? as usize;
    if current > steps.len() {
        return Err(StorageError::Migration(format!(
            "database schema v{} is newer than supported v{}",
            current,
            steps.len()
        )));
    }
    if current == steps.len() {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    for (index, sql) in steps.iter().enumerate().skip(current) {
        tx.execute_batch(sql).map_err(|e| {
            StorageError::Migration(format!("schema v{} failed: {}", index + 1, e))
        })?;
    }
    tx.pragma_update(None, "user_version", steps.len() as u32)?;
    tx.commit()?;

    tracing::debug!(from = current, to = steps.len(), "Migrated storage schema");
    Ok(())
}

/// Returns the applied schema version (0 for a fresh database).
pub(crate) fn schema_version(conn: &Connection) -> Result<u32, StorageError> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
