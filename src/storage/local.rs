//! Local filesystem storage implementation.
//!
//! Every artifact lives directly in the output directory. Writes go to a
//! temporary sibling first and are renamed into place.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ResourceType;
use crate::storage::{SnapshotStorage, diff_name, snapshot_name, view_name};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Root directory of the storage.
    pub fn root(&self) -> &PathBuf {
        &self.root_dir
    }

    /// Get the full path for a file name.
    fn path(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(name);

        let mut tmp = OsString::from(path.as_os_str());
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Err(e) = Self::write_then_rename(&tmp, &path, bytes).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                log::debug!("Could not remove {}: {cleanup}", tmp.display());
            }
            return Err(e);
        }
        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    async fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(tmp, path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SnapshotStorage for LocalStorage {
    async fn write_snapshot(
        &self,
        resource_type: ResourceType,
        date: NaiveDate,
        ndjson: &str,
    ) -> Result<PathBuf> {
        self.write_bytes(&snapshot_name(resource_type, date), ndjson.as_bytes())
            .await
    }

    async fn load_snapshot(
        &self,
        resource_type: ResourceType,
        date: NaiveDate,
    ) -> Result<Option<String>> {
        let name = snapshot_name(resource_type, date);
        match self.read_bytes(&name).await? {
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|e| {
                AppError::validation(format!("{name} is not valid UTF-8: {e}"))
            }),
            None => Ok(None),
        }
    }

    async fn write_view(
        &self,
        resource_type: ResourceType,
        date: NaiveDate,
        html: &str,
    ) -> Result<PathBuf> {
        self.write_bytes(&view_name(resource_type, date), html.as_bytes())
            .await
    }

    async fn write_diff(
        &self,
        resource_type: ResourceType,
        previous: NaiveDate,
        current: NaiveDate,
        html: &str,
    ) -> Result<PathBuf> {
        self.write_bytes(&diff_name(resource_type, previous, current), html.as_bytes())
            .await
    }
}
