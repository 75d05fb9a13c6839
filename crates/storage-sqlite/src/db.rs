//! Connection setup and base schema.

use log::debug;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::errors::{IntoCore, StorageError};
use wealthpulse_core::errors::Result;

/// Shared handle to the single database connection.
///
/// SQLite serializes writers anyway; one connection behind a mutex keeps
/// transactions trivially exclusive without a pool.
pub type DbHandle = Arc<Mutex<Connection>>;

/// Opens (creating if needed) the database at `db_path` and applies
/// connection pragmas and the base schema.
pub fn open(db_path: &Path) -> Result<DbHandle> {
    let conn = Connection::open(db_path).into_core()?;
    init_connection(&conn)?;
    debug!("Opened database at {}", db_path.display());
    Ok(Arc::new(Mutex::new(conn)))
}

/// Opens an in-memory database. Used by tests and ephemeral hosts.
pub fn open_in_memory() -> Result<DbHandle> {
    let conn = Connection::open_in_memory().into_core()?;
    init_connection(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn init_connection(conn: &Connection) -> Result<()> {
    // journal_mode returns the resulting mode as a row, so it can't go
    // through pragma_update.
    let _mode: String = conn
        .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
        .into_core()?;
    conn.pragma_update(None, "foreign_keys", "ON").into_core()?;
    conn.pragma_update(None, "synchronous", "NORMAL").into_core()?;
    conn.busy_timeout(Duration::from_secs(5)).into_core()?;
    Ok(())
}

/// Creates the base tables if they do not exist yet.
///
/// User-data tables all share the document layout; additional tables
/// created later are picked up by the backup service through
/// `sqlite_master` without any change here.
pub fn init(handle: &DbHandle) -> Result<()> {
    let conn = handle
        .lock()
        .map_err(|_| StorageError::ConnectionUnavailable("connection mutex poisoned".to_string()))?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS app_settings (
            setting_key TEXT PRIMARY KEY NOT NULL,
            setting_value TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS holdings (
            id TEXT PRIMARY KEY NOT NULL,
            doc TEXT NOT NULL
        );",
    )
    .into_core()?;
    Ok(())
}
