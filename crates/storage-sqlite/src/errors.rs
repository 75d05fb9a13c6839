//! Storage-specific error types for SQLite operations.
//!
//! This module provides error types that wrap rusqlite-specific errors and
//! convert them to the database-agnostic error types defined in
//! `wealthpulse_core`.

use rusqlite::Error as SqliteError;
use thiserror::Error;
use wealthpulse_core::errors::{DatabaseError, Error};

/// Storage-specific errors that wrap rusqlite types.
///
/// These errors are internal to the storage layer and are converted to
/// `wealthpulse_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] SqliteError),

    #[error("Connection unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::QueryFailed(SqliteError::QueryReturnedNoRows) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::ConnectionUnavailable(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e))
            }
            StorageError::InvalidTableName(e) => {
                Error::Database(DatabaseError::QueryFailed(format!("invalid table name: {}", e)))
            }
            StorageError::SerializationError(e) => Error::Database(DatabaseError::Internal(e)),
        }
    }
}

/// Extension trait for converting rusqlite Results to core Results.
///
/// We can't implement `From<rusqlite::Error> for Error` due to orphan
/// rules, so this provides an `.into_core()` method that routes through
/// [`StorageError`].
pub trait IntoCore<T> {
    fn into_core(self) -> wealthpulse_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, SqliteError> {
    fn into_core(self) -> wealthpulse_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}
