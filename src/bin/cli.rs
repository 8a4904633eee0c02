//! coursewatch CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use coursewatch::{
    config,
    error::{AppError, Result},
    notify,
    pipeline,
    services::HttpSite,
    storage::{LocalSnapshotStore, SnapshotStore},
};

/// coursewatch - Course Document Change Watcher
#[derive(Parser, Debug)]
#[command(
    name = "coursewatch",
    version,
    about = "Mirrors e-class course documents and reports changes"
)]
struct Cli {
    /// Path to the directory containing config.toml and courses.toml
    #[arg(short, long, default_value = "data")]
    config_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one check cycle over the configured courses
    Check {
        /// Only check the course with this key
        #[arg(long)]
        course: Option<String>,
    },

    /// Check repeatedly on a fixed interval
    Watch {
        /// Seconds between cycles (overrides the configured interval)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Validate configuration and course list
    Validate,

    /// Show stored snapshot info per course
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("coursewatch starting...");

    let (mut config, mut courses) = config::load_all(&cli.config_dir)?;
    log::info!(
        "Loaded {} course(s) from {}",
        courses.len(),
        cli.config_dir.display()
    );

    let store = LocalSnapshotStore::new(&cli.config_dir);

    match cli.command {
        Command::Check { course } => {
            if let Some(key) = course {
                courses.retain(|c| c.key == key);
                if courses.is_empty() {
                    return Err(AppError::config(format!("Unknown course key: {key}")));
                }
            }

            let config = Arc::new(config);
            let site = HttpSite::new(Arc::clone(&config))?;
            let notifier = notify::from_config(&config)?;

            let stats = pipeline::run_cycle(&config, &courses, &site, &store, &*notifier).await;
            log::info!(
                "Check finished in {}s: {} course(s), {} failed, {} change(s)",
                stats.duration_secs(),
                stats.course_count,
                stats.failure_count,
                stats.change_count
            );
        }

        Command::Watch { interval } => {
            if let Some(secs) = interval {
                config.crawler.interval_secs = secs;
            }

            let config = Arc::new(config);
            let site = HttpSite::new(Arc::clone(&config))?;
            let notifier = notify::from_config(&config)?;

            pipeline::run_watch(&config, &courses, &site, &store, &*notifier).await?;
        }

        Command::Validate => {
            log::info!("✓ Config OK (base url: {})", config.site.base_url);
            log::info!("✓ Courses OK ({} course(s))", courses.len());
            for course in &courses {
                log::info!("    {} - {} -> {}", course.key, course.name, course.url);
            }
            log::info!("All validations passed!");
        }

        Command::Info => {
            for course in &courses {
                match store.load(&course.key).await? {
                    Some(snapshot) => log::info!(
                        "{}: {} file(s) in {} folder(s)",
                        course.key,
                        snapshot.file_count(),
                        snapshot.folder_count() + 1
                    ),
                    None => log::info!("{}: no snapshot yet", course.key),
                }
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
