// src/models/mod.rs

//! Domain models for coursewatch.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod change;
mod config;
mod course;
mod tree;

// Re-export all public types
pub use change::{ChangeKind, ChangeRecord, CourseChanges};
pub use config::{Config, CrawlerConfig, NotifyConfig, SiteConfig};
pub use course::Course;
pub use tree::{FileEntry, FolderNode};
