use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::{BackupError, Result};

/// Host-supplied save-location picker.
///
/// `Ok(None)` means the user cancelled. Errors are plain strings so hosts
/// (native shells, test harnesses) do not depend on this crate's error
/// type.
#[async_trait]
pub trait SaveDialogTrait: Send + Sync {
    async fn pick_save_path(
        &self,
        suggested_filename: &str,
    ) -> std::result::Result<Option<PathBuf>, String>;
}

/// Where a delivered payload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered(PathBuf),
    Cancelled,
}

/// Writes export payloads where the user asked for them, falling back to a
/// fixed directory when the native dialog is unavailable.
pub struct DeliveryService {
    dialog: Arc<dyn SaveDialogTrait>,
    fallback_dir: PathBuf,
}

impl DeliveryService {
    pub fn new(dialog: Arc<dyn SaveDialogTrait>, fallback_dir: impl Into<PathBuf>) -> Self {
        Self {
            dialog,
            fallback_dir: fallback_dir.into(),
        }
    }

    /// Delivers `payload` under `suggested_filename`.
    ///
    /// Cancellation is a successful no-op, not an error. A dialog failure
    /// falls back to writing into the fallback directory; only a failed
    /// write surfaces as [`BackupError::DeliveryFailed`].
    pub async fn deliver(
        &self,
        payload: &[u8],
        suggested_filename: &str,
    ) -> Result<DeliveryOutcome> {
        match self.dialog.pick_save_path(suggested_filename).await {
            Ok(Some(path)) => {
                std::fs::write(&path, payload).map_err(|e| {
                    BackupError::DeliveryFailed(format!(
                        "write to {} failed: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(DeliveryOutcome::Delivered(path))
            }
            Ok(None) => {
                debug!("Export of '{}' cancelled by user", suggested_filename);
                Ok(DeliveryOutcome::Cancelled)
            }
            Err(e) => {
                warn!("Save dialog failed ({}), using fallback directory", e);
                let mut path = self.fallback_dir.join(suggested_filename);
                if path.exists() {
                    // Date-stamped suggestions collide across same-day
                    // exports; disambiguate with the time of day.
                    let stamped =
                        format!("{}_{}", Utc::now().format("%H%M%S"), suggested_filename);
                    path = self.fallback_dir.join(stamped);
                }
                std::fs::write(&path, payload).map_err(|e| {
                    BackupError::DeliveryFailed(format!(
                        "fallback write to {} failed: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(DeliveryOutcome::Delivered(path))
            }
        }
    }
}
