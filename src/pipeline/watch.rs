// src/pipeline/watch.rs

//! Recurring check cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::models::{Config, Course};
use crate::notify::Notifier;
use crate::pipeline::run_cycle;
use crate::services::site::CourseSite;
use crate::storage::SnapshotStore;

/// Run check cycles on the configured interval until the process exits.
///
/// Cycles are awaited in sequence, so two cycles never run concurrently for
/// the same snapshot keys; when a cycle overruns the interval the next one
/// is delayed rather than skipped or overlapped.
pub async fn run_watch(
    config: &Arc<Config>,
    courses: &[Course],
    site: &dyn CourseSite,
    store: &dyn SnapshotStore,
    notifier: &dyn Notifier,
) -> Result<()> {
    let period = Duration::from_secs(config.crawler.interval_secs);
    log::info!(
        "Watching {} course(s), checking every {}s",
        courses.len(),
        period.as_secs()
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let stats = run_cycle(config, courses, site, store, notifier).await;
        log::info!(
            "Cycle finished in {}s: {} course(s), {} failed, {} change(s)",
            stats.duration_secs(),
            stats.course_count,
            stats.failure_count,
            stats.change_count
        );
    }
}
