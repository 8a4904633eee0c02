// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading the application
//! configuration and the watched-course list from a config directory.

use std::path::Path;

use crate::error::Result;
use crate::models::{Config, Course};

/// Load configuration from `{base}/config.toml`.
///
/// Falls back to defaults if loading fails.
pub fn load_config(base_dir: &Path) -> Config {
    Config::load_or_default(base_dir.join("config.toml"))
}

/// Load the course list from `{base}/courses.toml`.
///
/// Unlike the configuration, an unreadable course list is fatal: without it
/// there is nothing to check.
pub fn load_courses(base_dir: &Path) -> Result<Vec<Course>> {
    Course::load_all(base_dir.join("courses.toml"))
}

/// Load and validate both configuration and course list.
pub fn load_all(base_dir: &Path) -> Result<(Config, Vec<Course>)> {
    let config = load_config(base_dir);
    config.validate()?;

    let courses = load_courses(base_dir)?;
    Ok((config, courses))
}
