//! SQLite store for claimdesk.
//!
//! Runtime defaults are intentionally conservative:
//! - `journal_mode = WAL` to allow concurrent readers while writers append
//! - `busy_timeout = 5s` to reduce transient lock failures under contention
//! - `foreign_keys = ON` to protect relational integrity
//!
//! The store exposes synchronous, stateless operations; concurrency is the
//! caller's concern.

pub mod entities;
pub mod events;
pub mod migrations;
pub mod schema;

use rusqlite::Connection;
use std::{path::Path, time::Duration};

use crate::error::{Error, Result};

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle on the claimdesk database.
///
/// Owns one connection. Entity reads/writes and event appends hang off this
/// type; the lifecycle engine brackets its dual writes with
/// [`Store::in_write_txn`].
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store at `path`, apply runtime pragmas, and
    /// migrate the schema to the latest version.
    ///
    /// # Errors
    ///
    /// Returns an error if opening, configuring, or migrating the database
    /// fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)?;
        configure_connection(&conn)?;
        migrations::migrate(&mut conn)?;

        tracing::debug!(path = %path.display(), "opened claimdesk store");
        Ok(Self { conn })
    }

    /// Open an in-memory store, migrated to the latest schema. Test-oriented,
    /// but also useful for dry runs.
    ///
    /// # Errors
    ///
    /// Returns an error if configuring or migrating the database fails.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::migrate(&mut conn)?;
        Ok(Self { conn })
    }

    pub(crate) const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction, committing on success
    /// and rolling back on error.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a store error if the transaction
    /// bracketing itself fails.
    pub(crate) fn in_write_txn<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f() {
            Ok(value) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(err) => {
                // Best effort: the original error is the one worth surfacing.
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

/// Current wall-clock time in microseconds since the Unix epoch.
#[must_use]
pub fn now_us() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

/// Map a SQLite unique-constraint violation to [`Error::DuplicateName`],
/// passing other failures through unchanged.
///
/// Matches on the extended result code: `SQLITE_CONSTRAINT` alone also
/// covers CHECK, NOT NULL, and foreign-key failures, which are not
/// duplicates.
pub(crate) fn map_unique_violation(err: rusqlite::Error, name: &str) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            Error::DuplicateName {
                name: name.to_string(),
            }
        }
        _ => Error::Store(err),
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BUSY_TIMEOUT, Store};
    use crate::store::migrations;

    #[test]
    fn open_sets_wal_busy_timeout_and_fk() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("claimdesk.sqlite3");
        let store = Store::open(&path).expect("open store");

        let journal_mode: String = store
            .conn()
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("query journal_mode");
        assert_eq!(journal_mode.to_ascii_lowercase(), "wal");

        let busy_timeout_ms: u64 = store
            .conn()
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .expect("query busy_timeout");
        assert_eq!(u128::from(busy_timeout_ms), DEFAULT_BUSY_TIMEOUT.as_millis());

        let foreign_keys: i64 = store
            .conn()
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("query foreign_keys");
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn open_runs_migrations() {
        let store = Store::open_in_memory().expect("open store");
        let version =
            migrations::current_schema_version(store.conn()).expect("schema version query");
        assert_eq!(version, migrations::LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn write_txn_rolls_back_on_error() {
        let store = Store::open_in_memory().expect("open store");
        let result: crate::error::Result<()> = store.in_write_txn(|| {
            store.conn().execute_batch(
                "INSERT INTO areas (name, description, created_at_us, updated_at_us)
                 VALUES ('IT', '', 0, 0)",
            )?;
            Err(crate::error::Error::ReasonRequired)
        });
        assert!(result.is_err());

        let count: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM areas", [], |row| row.get(0))
            .expect("count areas");
        assert_eq!(count, 0);
    }
}
