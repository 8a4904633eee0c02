// src/storage/local.rs

//! Local filesystem snapshot store.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── config.toml           # Application configuration
//! ├── courses.toml          # Watched courses
//! └── snapshots/
//!     ├── INF100.json       # One snapshot tree per course key
//!     └── INF200.json
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::FolderNode;
use crate::storage::SnapshotStore;

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalSnapshotStore {
    root_dir: PathBuf,
}

impl LocalSnapshotStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the snapshot path for a course key.
    fn path(&self, course_key: &str) -> PathBuf {
        self.root_dir.join("snapshots").join(format!("{course_key}.json"))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, path: &PathBuf) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn save(&self, course_key: &str, snapshot: &FolderNode) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        self.write_bytes(&self.path(course_key), &bytes).await
    }

    async fn load(&self, course_key: &str) -> Result<Option<FolderNode>> {
        let path = self.path(course_key);
        let Some(bytes) = self.read_bytes(&path).await? else {
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                log::warn!(
                    "Corrupt snapshot for {course_key} at {}: {e}. Treating as absent.",
                    path.display()
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileEntry;
    use tempfile::TempDir;

    fn sample_snapshot() -> FolderNode {
        FolderNode {
            url: "https://eclass.aueb.gr/modules/document/?course=INF100".to_string(),
            name: "Intro".to_string(),
            local_path: PathBuf::from("mirror/inf100"),
            folders: vec![FolderNode {
                url: "https://eclass.aueb.gr/modules/document/?course=INF100&openDir=/Labs/"
                    .to_string(),
                name: "Labs".to_string(),
                local_path: PathBuf::from("mirror/inf100/Labs"),
                folders: Vec::new(),
                files: vec![FileEntry {
                    url: "https://eclass.aueb.gr/docs/lab1.pdf".to_string(),
                    name: "lab1.pdf".to_string(),
                    digest: Some("abc".to_string()),
                    etag: Some("\"v1\"".to_string()),
                }],
            }],
            files: vec![FileEntry {
                url: "https://eclass.aueb.gr/docs/syllabus.pdf".to_string(),
                name: "syllabus.pdf".to_string(),
                digest: None,
                etag: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSnapshotStore::new(tmp.path());

        let snapshot = sample_snapshot();
        store.save("INF100", &snapshot).await.unwrap();

        let loaded = store.load("INF100").await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSnapshotStore::new(tmp.path());

        assert!(store.load("INF999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSnapshotStore::new(tmp.path());

        let path = store.path("INF100");
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        assert!(store.load("INF100").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous() {
        let tmp = TempDir::new().unwrap();
        let store = LocalSnapshotStore::new(tmp.path());

        let mut snapshot = sample_snapshot();
        store.save("INF100", &snapshot).await.unwrap();

        snapshot.files.clear();
        store.save("INF100", &snapshot).await.unwrap();

        let loaded = store.load("INF100").await.unwrap().unwrap();
        assert!(loaded.files.is_empty());

        // no leftover temp file from the atomic write
        assert!(!store.path("INF100").with_extension("tmp").exists());
    }
}
