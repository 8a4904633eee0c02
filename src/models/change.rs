// src/models/change.rs

//! Change records produced by the diff engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a detected change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    FileAdded,
    FileDeleted,
    FileUpdated,
    DirectoryAdded,
    DirectoryDeleted,
}

impl ChangeKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::FileAdded => "Added file",
            ChangeKind::FileDeleted => "Deleted file",
            ChangeKind::FileUpdated => "Modified file",
            ChangeKind::DirectoryAdded => "Added directory",
            ChangeKind::DirectoryDeleted => "Deleted directory",
        }
    }

    fn is_addition(&self) -> bool {
        matches!(self, ChangeKind::FileAdded | ChangeKind::DirectoryAdded)
    }

    fn is_deletion(&self) -> bool {
        matches!(self, ChangeKind::FileDeleted | ChangeKind::DirectoryDeleted)
    }
}

/// One detected difference, at the logical path where it occurred.
///
/// Paths join ancestor display names with `/`, rooted at the course name,
/// e.g. `Course/Labs/lab1.pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub path: String,
}

impl ChangeRecord {
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.path)
    }
}

/// The accumulated ordered change list for one course in one cycle.
///
/// Built per cycle and handed to the notifier, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseChanges {
    pub course_key: String,
    pub course_name: String,
    pub records: Vec<ChangeRecord>,
}

impl CourseChanges {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Compact count line: `+ added − deleted ~ modified`.
    pub fn summary(&self) -> String {
        let added = self.records.iter().filter(|r| r.kind.is_addition()).count();
        let deleted = self.records.iter().filter(|r| r.kind.is_deletion()).count();
        let modified = self
            .records
            .iter()
            .filter(|r| r.kind == ChangeKind::FileUpdated)
            .count();
        format!("+ {added} − {deleted} ~ {modified}")
    }

    /// Plain-text changelog section for this course.
    pub fn render_plain(&self) -> String {
        let mut out = format!("=== Course: {} ({}) ===\n", self.course_name, self.summary());
        for record in &self.records {
            out.push_str(&format!("- {record}\n"));
        }
        out
    }
}
