// src/models/tree.rs

//! Snapshot tree data structures.
//!
//! A snapshot is one `FolderNode` tree rooted at a course's top-level
//! document folder. Folders and files are keyed by their remote URL, which
//! stays stable across crawls; display names come from the link text that
//! pointed at them and can collide or change.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One remote file tracked within a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Canonical remote address, stable identity across crawls
    pub url: String,

    /// Human file name
    pub name: String,

    /// Hex digest of the file body at the last successful fetch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Server-supplied change token from the same fetch as `digest`.
    /// The two are always refreshed or carried forward together.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// One remote folder and its local mirror state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Canonical remote address, stable identity across crawls
    pub url: String,

    /// Human folder name, used for path construction and reporting
    pub name: String,

    /// Local directory this folder's files are mirrored to
    pub local_path: PathBuf,

    /// Child folders, in the order they appeared on the page
    #[serde(default)]
    pub folders: Vec<FolderNode>,

    /// Files, in the order they appeared on the page
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl FolderNode {
    /// Create an empty folder node.
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            local_path: local_path.into(),
            folders: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Empty snapshot, returned when no previous snapshot exists so the
    /// first diff reports the entire new tree as additions.
    pub fn empty() -> Self {
        Self::new("", "", PathBuf::new())
    }

    /// Total files in this folder and all subfolders.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.folders.iter().map(|f| f.file_count()).sum::<usize>()
    }

    /// Total subfolders below this folder.
    pub fn folder_count(&self) -> usize {
        self.folders.len() + self.folders.iter().map(|f| f.folder_count()).sum::<usize>()
    }
}
