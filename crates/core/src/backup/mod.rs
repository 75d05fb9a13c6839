//! Snapshot backup/restore, CSV export and the delivery adapter.

mod backup_model;
mod backup_service;
mod backup_traits;
mod csv_export;
mod delivery;

pub use backup_model::{RestorePreview, SnapshotDocument, SnapshotMeta};
pub use backup_service::{
    holdings_filename, parse_snapshot, snapshot_filename, BackupService,
};
pub use backup_traits::{BackupStoreTrait, BackupTxn};
pub use csv_export::export_holdings_csv;
pub use delivery::{DeliveryOutcome, DeliveryService, SaveDialogTrait};

use crate::settings::{KEY_BUBBLE_LIMIT, KEY_BULLION_CAP, KEY_PROFIT_BOOKING};

/// Settings keys carried in a snapshot's `storage` section.
///
/// Only these keys round-trip through backup; everything else in the
/// key-value store is device-local and stays behind.
pub const SETTINGS_ALLOW_LIST: &[&str] = &[
    "base_currency",
    "theme",
    KEY_BULLION_CAP,
    KEY_PROFIT_BOOKING,
    KEY_BUBBLE_LIMIT,
    "market.scenario",
    "notifications.enabled",
];
