//! Backup-store and key-value implementations over document tables.
//!
//! User data lives in schemaless document tables (`id TEXT PRIMARY KEY,
//! doc TEXT`). The backup service never needs compile-time knowledge of the
//! schema: tables are enumerated from `sqlite_master` and rows are copied
//! as raw JSON.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde_json::Value;
use std::sync::MutexGuard;

use crate::db::DbHandle;
use crate::errors::{IntoCore, StorageError};
use wealthpulse_core::backup::{BackupStoreTrait, BackupTxn};
use wealthpulse_core::errors::{DatabaseError, Result};
use wealthpulse_core::settings::KeyValueStoreTrait;

/// Tables never included in snapshots. Settings go through the allow-list
/// in the backup service instead.
const INTERNAL_TABLES: &[&str] = &["app_settings"];

pub struct SqliteBackupStore {
    handle: DbHandle,
}

impl SqliteBackupStore {
    pub fn new(handle: DbHandle) -> Self {
        Self { handle }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.handle.lock().map_err(|_| {
            StorageError::ConnectionUnavailable("connection mutex poisoned".to_string()).into()
        })
    }
}

/// Guards dynamic identifiers interpolated into SQL. Table names come from
/// `sqlite_master` or from snapshot documents, never from bind parameters,
/// so they are restricted to plain identifiers.
fn check_table_name(table: &str) -> Result<()> {
    let valid = !table.is_empty()
        && !table.starts_with(|c: char| c.is_ascii_digit())
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidTableName(table.to_string()).into())
    }
}

impl BackupStoreTrait for SqliteBackupStore {
    fn list_tables(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
            )
            .into_core()?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .into_core()?
            .collect::<std::result::Result<Vec<_>, _>>()
            .into_core()?;
        Ok(names
            .into_iter()
            .filter(|name| !INTERNAL_TABLES.contains(&name.as_str()))
            .collect())
    }

    fn read_all(&self, table: &str) -> Result<Vec<Value>> {
        check_table_name(table)?;
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(&format!("SELECT doc FROM \"{}\" ORDER BY id", table))
            .into_core()?;
        let docs = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .into_core()?
            .collect::<std::result::Result<Vec<String>, _>>()
            .into_core()?;
        docs.iter()
            .map(|raw| {
                serde_json::from_str(raw).map_err(|e| {
                    DatabaseError::Internal(format!("corrupt document in '{}': {}", table, e))
                        .into()
                })
            })
            .collect()
    }

    fn with_transaction(
        &self,
        work: &mut dyn FnMut(&mut dyn BackupTxn) -> Result<()>,
    ) -> Result<()> {
        let mut conn = self.conn()?;
        let txn = conn.transaction().into_core()?;
        let mut wrapper = SqliteTxn { txn: &txn };
        match work(&mut wrapper) {
            Ok(()) => txn
                .commit()
                .map_err(|e| DatabaseError::TransactionFailed(e.to_string()).into()),
            // Dropping the transaction rolls it back.
            Err(e) => Err(e),
        }
    }
}

struct SqliteTxn<'a, 'c> {
    txn: &'a Transaction<'c>,
}

impl BackupTxn for SqliteTxn<'_, '_> {
    fn clear(&mut self, table: &str) -> Result<()> {
        check_table_name(table)?;
        self.txn
            .execute(&format!("DELETE FROM \"{}\"", table), [])
            .into_core()?;
        Ok(())
    }

    fn bulk_upsert(&mut self, table: &str, rows: &[Value]) -> Result<()> {
        check_table_name(table)?;
        // Snapshots may carry tables this database has not seen yet.
        self.txn
            .execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS \"{}\" (
                        id TEXT PRIMARY KEY NOT NULL,
                        doc TEXT NOT NULL
                    )",
                    table
                ),
                [],
            )
            .into_core()?;

        let mut stmt = self
            .txn
            .prepare(&format!(
                "INSERT OR REPLACE INTO \"{}\" (id, doc) VALUES (?1, ?2)",
                table
            ))
            .into_core()?;
        for row in rows {
            let id = row.get("id").and_then(Value::as_str).ok_or_else(|| {
                DatabaseError::QueryFailed(format!("row in '{}' has no string 'id'", table))
            })?;
            let doc = serde_json::to_string(row)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            stmt.execute(params![id, doc]).into_core()?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStoreTrait for SqliteBackupStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT setting_value FROM app_settings WHERE setting_key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .into_core()
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO app_settings (setting_key, setting_value) VALUES (?1, ?2)",
            params![key, value],
        )
        .into_core()?;
        Ok(())
    }
}
