use chrono::{NaiveDate, Utc};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{
    BackupStoreTrait, BackupTxn, RestorePreview, SnapshotDocument, SnapshotMeta,
    SETTINGS_ALLOW_LIST,
};
use crate::constants::{APP_ID, SNAPSHOT_SCHEMA_VERSION};
use crate::errors::{BackupError, Result};
use crate::settings::KeyValueStoreTrait;

/// Builds, previews and applies full-state snapshots.
pub struct BackupService {
    store: Arc<dyn BackupStoreTrait>,
    kv: Arc<dyn KeyValueStoreTrait>,
}

impl BackupService {
    pub fn new(store: Arc<dyn BackupStoreTrait>, kv: Arc<dyn KeyValueStoreTrait>) -> Self {
        Self { store, kv }
    }

    /// Captures the complete persisted state plus allow-listed settings.
    /// Read-only.
    pub fn build_snapshot(&self) -> Result<SnapshotDocument> {
        let mut data = BTreeMap::new();
        for table in self.store.list_tables()? {
            let rows = self.store.read_all(&table)?;
            debug!("Snapshot captured {} rows from '{}'", rows.len(), table);
            data.insert(table, rows);
        }

        let mut storage = BTreeMap::new();
        for key in SETTINGS_ALLOW_LIST {
            if let Some(value) = self.kv.get(key)? {
                storage.insert((*key).to_string(), value);
            }
        }

        Ok(SnapshotDocument {
            meta: SnapshotMeta {
                version: SNAPSHOT_SCHEMA_VERSION,
                timestamp: Utc::now(),
                app: APP_ID.to_string(),
            },
            data,
            storage,
        })
    }

    /// Reports what [`BackupService::restore`] would do, without touching
    /// the store.
    pub fn preview_restore(&self, document: &SnapshotDocument) -> Result<RestorePreview> {
        validate(document)?;

        let row_counts = document
            .data
            .iter()
            .map(|(table, rows)| (table.clone(), rows.len()))
            .collect();
        let tables_losing_data = self
            .store
            .list_tables()?
            .into_iter()
            .filter(|table| document.data.get(table).map_or(true, |rows| rows.is_empty()))
            .collect();

        Ok(RestorePreview {
            row_counts,
            tables_losing_data,
            settings_keys: document.storage.keys().cloned().collect(),
        })
    }

    /// Replaces the persisted state with the document's contents.
    ///
    /// Validation runs before anything destructive. Every live table is then
    /// cleared and repopulated inside one transaction; an error on any table
    /// rolls the entire restore back. Settings write-back happens after the
    /// commit and is best-effort: a failed key is logged, not fatal, since
    /// the table data is already safely in place.
    pub async fn restore(&self, document: &SnapshotDocument) -> Result<()> {
        validate(document)?;

        let live_tables = self.store.list_tables()?;
        let losing_data: Vec<&String> = live_tables
            .iter()
            .filter(|table| {
                document
                    .data
                    .get(*table)
                    .map_or(true, |rows| rows.is_empty())
            })
            .collect();
        if !losing_data.is_empty() {
            warn!(
                "Restore will clear tables with no incoming rows: {:?}",
                losing_data
            );
        }

        self.store.with_transaction(&mut |txn| {
            for table in &live_tables {
                txn.clear(table)?;
            }
            for (table, rows) in &document.data {
                if !rows.is_empty() {
                    txn.bulk_upsert(table, rows)?;
                }
            }
            Ok(())
        })?;
        debug!(
            "Restored {} tables from snapshot dated {}",
            document.data.len(),
            document.meta.timestamp
        );

        for (key, value) in &document.storage {
            if let Err(e) = self.kv.set(key, value).await {
                warn!("Failed to restore setting '{}': {}", key, e);
            }
        }

        Ok(())
    }
}

/// Shape checks that must pass before any destructive action. An empty
/// `data` map is a valid (if drastic) snapshot; a wrong app id, an
/// unsupported version or non-object rows are not.
fn validate(document: &SnapshotDocument) -> Result<()> {
    if document.meta.app != APP_ID {
        return Err(BackupError::InvalidFormat(format!(
            "snapshot was produced by '{}', expected '{}'",
            document.meta.app, APP_ID
        ))
        .into());
    }
    if document.meta.version <= 0 || document.meta.version > SNAPSHOT_SCHEMA_VERSION {
        return Err(BackupError::InvalidFormat(format!(
            "unsupported snapshot version {}",
            document.meta.version
        ))
        .into());
    }
    for (table, rows) in &document.data {
        if rows.iter().any(|row| !row.is_object()) {
            return Err(BackupError::InvalidFormat(format!(
                "table '{}' contains a non-object row",
                table
            ))
            .into());
        }
    }
    Ok(())
}

/// Parses raw snapshot text. Malformed JSON and missing roots both surface
/// as [`BackupError::InvalidFormat`].
pub fn parse_snapshot(raw: &str) -> Result<SnapshotDocument> {
    serde_json::from_str(raw)
        .map_err(|e| BackupError::InvalidFormat(format!("not a valid snapshot: {}", e)).into())
}

/// Suggested filename for a snapshot export.
pub fn snapshot_filename(date: NaiveDate) -> String {
    format!("WealthBackup_{}.json", date.format("%Y-%m-%d"))
}

/// Suggested filename for a holdings CSV export.
pub fn holdings_filename(date: NaiveDate) -> String {
    format!("WealthHoldings_{}.csv", date.format("%Y-%m-%d"))
}
