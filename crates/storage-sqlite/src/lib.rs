//! SQLite storage implementation for WealthPulse.
//!
//! This crate provides all database-related functionality using rusqlite.
//! It implements the storage capability traits defined in `wealthpulse-core`:
//! - [`wealthpulse_core::backup::BackupStoreTrait`] over schemaless
//!   document tables (`id TEXT PRIMARY KEY, doc TEXT`), so the backup
//!   service can enumerate and copy tables without compile-time schema
//!   knowledge
//! - [`wealthpulse_core::settings::KeyValueStoreTrait`] over the
//!   `app_settings` table
//!
//! # Architecture
//!
//! This crate is the only place in the application where SQLite
//! dependencies exist. Everything else is database-agnostic and works with
//! traits.
//!
//! ```text
//!            core (domain)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod store;


pub use db::{init, open, open_in_memory, DbHandle};
pub use errors::{IntoCore, StorageError};
pub use store::SqliteBackupStore;

// Re-export from wealthpulse-core for convenience
pub use wealthpulse_core::errors::{DatabaseError, Error, Result};
