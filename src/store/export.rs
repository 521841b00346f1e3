//! Snapshot export: writes the whole case store out after each input.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use crate::error::StoreError;
use crate::store::cases::StoreSnapshot;

/// Destination for case store snapshots. Failures are reported, never fatal.
#[async_trait]
pub trait StoreExporter: Send + Sync {
    /// Persist `snapshot`; `key` is the thread id that triggered the export.
    async fn export(&self, snapshot: &StoreSnapshot, key: &str) -> Result<(), StoreError>;
}

/// Writes the snapshot as pretty-printed JSON, replacing the file each time.
pub struct JsonFileExporter {
    path: PathBuf,
}

impl JsonFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StoreExporter for JsonFileExporter {
    async fn export(&self, snapshot: &StoreSnapshot, key: &str) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(snapshot)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, body)
            .await
            .map_err(|e| StoreError::Write {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        info!(thread_id = key, path = %self.path.display(), "Case store exported");
        Ok(())
    }
}

/// Read a snapshot previously written by [`JsonFileExporter`].
pub async fn load_snapshot(path: &Path) -> Result<StoreSnapshot, StoreError> {
    let raw = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
