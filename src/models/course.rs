// src/models/course.rs

//! Course configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A configured course to watch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Stable key identifying the course across cycles (snapshot key)
    pub key: String,

    /// Display name, used as the root of reported change paths
    pub name: String,

    /// URL of the course's top-level document folder
    pub url: String,

    /// Local directory the course's documents are mirrored to
    pub local_dir: PathBuf,
}

/// On-disk layout of `courses.toml`.
#[derive(Debug, Default, Deserialize)]
struct CourseFile {
    #[serde(default)]
    courses: Vec<Course>,
}

impl Course {
    /// Load the course list from a TOML file.
    ///
    /// An unreadable or invalid course list is fatal to the whole cycle,
    /// since no courses can be processed without it.
    pub fn load_all(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Cannot read course list {path:?}: {e}")))?;
        let file: CourseFile = toml::from_str(&content)
            .map_err(|e| AppError::config(format!("Invalid course list {path:?}: {e}")))?;

        validate(&file.courses)?;
        Ok(file.courses)
    }
}

fn validate(courses: &[Course]) -> Result<()> {
    if courses.is_empty() {
        return Err(AppError::config("No courses defined"));
    }
    for course in courses {
        if course.key.trim().is_empty() {
            return Err(AppError::config("Course with empty key"));
        }
        if course.name.trim().is_empty() {
            return Err(AppError::config(format!(
                "Course {} has an empty name",
                course.key
            )));
        }
        url::Url::parse(&course.url).map_err(|e| {
            AppError::config(format!("Course {} has an invalid url: {e}", course.key))
        })?;
    }

    let mut keys: Vec<&str> = courses.iter().map(|c| c.key.as_str()).collect();
    keys.sort_unstable();
    keys.dedup();
    if keys.len() != courses.len() {
        return Err(AppError::config("Duplicate course keys"));
    }
    Ok(())
}
