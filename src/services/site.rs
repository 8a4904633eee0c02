// src/services/site.rs

//! Authenticated access to the course-management site.
//!
//! `CourseSite` is the seam between the crawl core and the network: page
//! fetching, change-token probing, and file download. `HttpSite` implements
//! it over a cookie-carrying `reqwest` client and renews the session
//! transparently when a response turns out to be the login page.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::classifier::Anchor;
use crate::services::drive;
use crate::utils::url::file_name;

/// A fetched folder page, reduced to its anchors.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub anchors: Vec<Anchor>,
}

/// Network collaborators consumed by the snapshot builder.
#[async_trait]
pub trait CourseSite: Send + Sync {
    /// Fetch a folder page and extract its anchors. Re-authenticates
    /// transparently; failure is fatal to the course being crawled.
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage>;

    /// Probe the server change token for a file without transferring the
    /// body. Errors degrade to `None`; the probe is an optimization only.
    async fn probe_etag(&self, url: &str) -> Option<String>;

    /// Download a file into `dest_dir`, creating directories as needed,
    /// and return the saved path.
    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// `CourseSite` implementation over HTTP with session management.
pub struct HttpSite {
    config: Arc<Config>,
    client: Client,
}

impl HttpSite {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.crawler.user_agent)
            .timeout(Duration::from_secs(config.crawler.timeout_secs))
            .cookie_store(true)
            .build()?;

        Ok(Self { config, client })
    }

    /// Log in to refresh the session cookie.
    async fn login(&self) -> Result<()> {
        let site = &self.config.site;
        log::info!("Refreshing session via {}", site.login_url());

        let params = [
            ("uname", site.username.as_str()),
            ("pass", site.password.as_str()),
            ("submit", "Είσοδος"),
        ];
        self.client
            .post(site.login_url())
            .form(&params)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::fetch(url, e))?;
        response.text().await.map_err(|e| AppError::fetch(url, e))
    }
}

#[async_trait]
impl CourseSite for HttpSite {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage> {
        let site = &self.config.site;
        let mut body = self.fetch_text(url).await?;

        if body.contains(&site.login_marker) {
            // one session refresh, one retry, then fail hard
            log::info!("Login page detected at {url}, re-authenticating");
            self.login().await?;
            body = self.fetch_text(url).await?;
            if body.contains(&site.login_marker) {
                return Err(AppError::auth(url));
            }
        }

        if body.contains(&site.registration_marker) {
            return Err(AppError::fetch(
                url,
                "account is not enrolled in this course",
            ));
        }

        Ok(FetchedPage {
            url: url.to_string(),
            anchors: extract_anchors(&body),
        })
    }

    async fn probe_etag(&self, url: &str) -> Option<String> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .ok()?;
        response
            .headers()
            .get(reqwest::header::ETAG)?
            .to_str()
            .ok()
            .map(String::from)
    }

    async fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        if self.config.site.is_drive_url(url) {
            return drive::download(&self.client, url, dest_dir).await;
        }

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::download(url, e))?;

        if response.status() == StatusCode::FORBIDDEN {
            // stale session cookie, refresh once and retry
            self.login().await?;
            response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| AppError::download(url, e))?;
        }
        let mut response = response
            .error_for_status()
            .map_err(|e| AppError::download(url, e))?;

        tokio::fs::create_dir_all(dest_dir).await?;
        let dest = dest_dir.join(file_name(url, "downloaded_file"));
        let mut file = tokio::fs::File::create(&dest).await?;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::download(url, e))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(dest)
    }
}

/// Extract `(href, text)` anchor pairs from an HTML document.
pub fn extract_anchors(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("static selector");

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let text: String = element.text().collect();
            Some(Anchor::new(href, text.trim()))
        })
        .collect()
}
