use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Identifying metadata stamped onto every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub version: i32,
    pub timestamp: DateTime<Utc>,
    pub app: String,
}

/// Complete snapshot of the persisted state.
///
/// `data` maps each table name to its rows as raw JSON documents, so the
/// snapshot survives schema additions without code changes. `storage`
/// carries the allow-listed settings keys. `BTreeMap` keeps the serialized
/// output stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub meta: SnapshotMeta,
    pub data: BTreeMap<String, Vec<Value>>,
    pub storage: BTreeMap<String, String>,
}

/// What applying a snapshot would do, computed without touching the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorePreview {
    /// Incoming row counts per table.
    pub row_counts: BTreeMap<String, usize>,
    /// Live tables the document carries no rows for. Restoring wipes these;
    /// hosts should confirm with the user before proceeding.
    pub tables_losing_data: Vec<String>,
    /// Settings keys the document would write back.
    pub settings_keys: Vec<String>,
}
