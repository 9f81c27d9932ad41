//! Local content resolution over a Zotero data directory.
//!
//! Attachment files live at `<data_dir>/storage/<KEY>/<filename>`; the
//! indexer's extracted text lives next to them under a fixed cache file
//! name. Every probe failure here (missing file, unreadable file,
//! failed stat) is treated as a cache miss and falls through to the
//! remote path, never as an error.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::api;

/// Read-only view of the local storage layout.
#[derive(Debug, Clone)]
pub struct LocalStore {
    data_dir: PathBuf,
}

/// A locally resolved attachment file.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub path: PathBuf,
    /// Size in bytes; `None` when the stat failed.
    pub size: Option<u64>,
}

impl LocalStore {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    /// Storage directory for one attachment key.
    #[must_use]
    pub fn storage_dir(&self, key: &str) -> PathBuf {
        self.data_dir.join("storage").join(key)
    }

    /// Probe for the attachment's original file.
    pub async fn find_file(&self, key: &str, filename: Option<&str>) -> Option<LocalFile> {
        let filename = filename?;
        let path = self.storage_dir(key).join(filename);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return None;
        }
        let size = tokio::fs::metadata(&path).await.map(|m| m.len()).ok();
        debug!(key, path = %path.display(), "resolved attachment locally");
        Some(LocalFile { path, size })
    }

    /// Read the attachment's original file, if present.
    pub async fn read_file(&self, key: &str, filename: Option<&str>) -> Option<(PathBuf, Vec<u8>)> {
        let path = self.storage_dir(key).join(filename?);
        let bytes = tokio::fs::read(&path).await.ok()?;
        debug!(key, len = bytes.len(), "read attachment bytes from local storage");
        Some((path, bytes))
    }

    /// Read the extracted-text cache for an attachment, if present.
    pub async fn read_fulltext_cache(&self, key: &str) -> Option<String> {
        let path = self.storage_dir(key).join(api::FULLTEXT_CACHE_FILE);
        let content = tokio::fs::read_to_string(&path).await.ok()?;
        debug!(key, len = content.len(), "resolved full text from local cache");
        Some(content)
    }

    /// Root of the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
