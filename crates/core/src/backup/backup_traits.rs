use serde_json::Value;

use crate::errors::Result;

/// Storage capability required by snapshot backup and restore.
///
/// Implementations enumerate their own tables, which keeps the backup
/// service schema-agnostic: a table added to the storage layer is picked up
/// by the next snapshot automatically.
pub trait BackupStoreTrait: Send + Sync {
    /// Names of every user-data table, in a stable order.
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Reads every row of `table` as a raw JSON document.
    fn read_all(&self, table: &str) -> Result<Vec<Value>>;

    /// Runs `work` inside a single transaction. Any error rolls the whole
    /// transaction back; partial restores must be impossible.
    fn with_transaction(
        &self,
        work: &mut dyn FnMut(&mut dyn BackupTxn) -> Result<()>,
    ) -> Result<()>;
}

/// Mutating operations available inside a backup transaction.
pub trait BackupTxn {
    /// Deletes every row of `table`.
    fn clear(&mut self, table: &str) -> Result<()>;

    /// Inserts rows, replacing on primary-key conflict.
    fn bulk_upsert(&mut self, table: &str, rows: &[Value]) -> Result<()>;
}
