// src/storage/mod.rs

//! Snapshot persistence.
//!
//! One snapshot record per course, addressable by course key, holding the
//! full `FolderNode` tree between crawl cycles.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::FolderNode;

// Re-export for convenience
pub use local::LocalSnapshotStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist the full snapshot tree for a course, including every file's
    /// digest and change token.
    async fn save(&self, course_key: &str, snapshot: &FolderNode) -> Result<()>;

    /// Load the previous snapshot for a course.
    ///
    /// A missing or unreadable snapshot is `None`, never an error; the diff
    /// then reports the entire new tree as additions.
    async fn load(&self, course_key: &str) -> Result<Option<FolderNode>>;
}
