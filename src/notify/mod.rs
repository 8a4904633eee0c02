// src/notify/mod.rs

//! Change notification boundary.
//!
//! The pipeline hands each cycle's non-empty per-course change lists to a
//! `Notifier` once; what happens to them afterwards is not the crawl core's
//! concern beyond logging.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, CourseChanges};

/// Receives the aggregated per-course change lists for one cycle.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, changes: &[CourseChanges]) -> Result<()>;
}

/// Build the configured notifier: webhook when a URL is set, logger
/// otherwise.
pub fn from_config(config: &Config) -> Result<Box<dyn Notifier>> {
    match &config.notify.webhook_url {
        Some(url) => Ok(Box::new(WebhookNotifier::new(config, url)?)),
        None => Ok(Box::new(ConsoleNotifier)),
    }
}

/// Renders the changelog through the standard logger.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, changes: &[CourseChanges]) -> Result<()> {
        for course in changes {
            for line in course.render_plain().lines() {
                log::info!("{line}");
            }
        }
        Ok(())
    }
}

/// POSTs the change lists as JSON to a configured endpoint.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(config: &Config, url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.crawler.user_agent)
            .timeout(Duration::from_secs(config.crawler.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, changes: &[CourseChanges]) -> Result<()> {
        let body = serde_json::to_vec(changes)?;

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::notify(format!("webhook {}: {e}", self.url)))?;

        response
            .error_for_status()
            .map_err(|e| AppError::notify(format!("webhook {}: {e}", self.url)))?;

        let total: usize = changes.iter().map(|c| c.len()).sum();
        log::info!(
            "Webhook notified: {} change(s) across {} course(s)",
            total,
            changes.len()
        );
        Ok(())
    }
}
