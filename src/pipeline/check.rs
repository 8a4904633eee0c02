// src/pipeline/check.rs

//! One check cycle: crawl each course, diff against the previous snapshot,
//! persist the new snapshot, and hand the accumulated changes to the
//! notifier.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{Config, Course, CourseChanges};
use crate::notify::Notifier;
use crate::services::{TreeBuilder, diff_trees};
use crate::services::site::CourseSite;
use crate::storage::SnapshotStore;

/// Summary of one check cycle.
#[derive(Debug, Clone)]
pub struct CycleStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub course_count: usize,
    pub failure_count: usize,
    pub change_count: usize,
}

impl CycleStats {
    pub fn duration_secs(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }
}

/// Check a single course and return its accumulated changes.
///
/// Fatal errors (page fetch, authentication, snapshot write) propagate to
/// the caller; they abort this course only.
pub async fn process_course(
    config: &Arc<Config>,
    course: &Course,
    site: &dyn CourseSite,
    store: &dyn SnapshotStore,
) -> Result<CourseChanges> {
    log::info!("Processing course '{}' ({})", course.name, course.key);

    let previous = store.load(&course.key).await?;

    let builder = TreeBuilder::new(site, Arc::clone(config))?;
    let latest = builder.build(course, previous.as_ref()).await?;

    let records = diff_trees(previous.as_ref(), &latest);

    store.save(&course.key, &latest).await?;
    log::info!(
        "Course '{}': {} file(s), {} folder(s), {} change(s)",
        course.name,
        latest.file_count(),
        latest.folder_count(),
        records.len()
    );

    Ok(CourseChanges {
        course_key: course.key.clone(),
        course_name: course.name.clone(),
        records,
    })
}

/// Run one full check cycle over all configured courses.
///
/// Courses run sequentially; a failed course is logged and never blocks the
/// remaining ones. The notifier is invoked once, with the non-empty change
/// lists, after every course has finished.
pub async fn run_cycle(
    config: &Arc<Config>,
    courses: &[Course],
    site: &dyn CourseSite,
    store: &dyn SnapshotStore,
    notifier: &dyn Notifier,
) -> CycleStats {
    let start_time = Utc::now();
    log::info!("Starting check cycle for {} course(s)", courses.len());

    let mut changed: Vec<CourseChanges> = Vec::new();
    let mut failure_count = 0;

    for course in courses {
        match process_course(config, course, site, store).await {
            Ok(changes) if changes.is_empty() => {
                log::info!("Course '{}': no changes detected", course.name);
            }
            Ok(changes) => {
                for record in &changes.records {
                    log::info!("{record} (Course: {})", course.name);
                }
                changed.push(changes);
            }
            Err(e) => {
                failure_count += 1;
                log::error!("Course '{}' failed: {e}", course.name);
            }
        }
    }

    if !changed.is_empty() {
        if let Err(e) = notifier.notify(&changed).await {
            log::error!("Notification dispatch failed: {e}");
        }
    }

    CycleStats {
        start_time,
        end_time: Utc::now(),
        course_count: courses.len(),
        failure_count,
        change_count: changed.iter().map(|c| c.len()).sum(),
    }
}
