// src/services/builder.rs

//! Snapshot builder.
//!
//! Recursively crawls a course's document folders into a `FolderNode` tree
//! mirroring the remote structure. The previous cycle's snapshot is threaded
//! through the recursion so unchanged files (same server change token) are
//! carried forward without re-downloading.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::{Config, Course, FileEntry, FolderNode};
use crate::services::classifier::{Link, LinkClassifier};
use crate::services::site::CourseSite;
use crate::utils::hash;

/// Builds snapshot trees for configured courses.
pub struct TreeBuilder<'a> {
    site: &'a dyn CourseSite,
    classifier: LinkClassifier,
    config: Arc<Config>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(site: &'a dyn CourseSite, config: Arc<Config>) -> Result<Self> {
        let classifier = LinkClassifier::new(&config)?;
        Ok(Self {
            site,
            classifier,
            config,
        })
    }

    /// Build the snapshot tree for a course.
    ///
    /// A page fetch failure anywhere in the tree aborts the build; a single
    /// file download failure does not (the file keeps its prior state).
    pub async fn build(
        &self,
        course: &Course,
        previous: Option<&FolderNode>,
    ) -> Result<FolderNode> {
        self.build_folder(
            course.url.clone(),
            course.local_dir.clone(),
            course.name.clone(),
            previous,
            0,
        )
        .await
    }

    fn build_folder<'b>(
        &'b self,
        url: String,
        local_path: PathBuf,
        name: String,
        previous: Option<&'b FolderNode>,
        depth: usize,
    ) -> BoxFuture<'b, Result<FolderNode>> {
        async move {
            if depth > self.config.crawler.max_depth {
                // folder links form a strict hierarchy in practice; hitting
                // this means the page structure is not what we assume
                return Err(AppError::crawl(url.clone(), "maximum folder depth exceeded"));
            }

            log::info!("Crawling folder {url}");
            tokio::fs::create_dir_all(&local_path).await?;

            let page = self.site.fetch_page(&url).await?;
            let classified = self.classifier.classify(&page.url, &page.anchors);

            let prev_files: HashMap<&str, &FileEntry> = previous
                .map(|p| p.files.iter().map(|f| (f.url.as_str(), f)).collect())
                .unwrap_or_default();

            let delay = Duration::from_millis(self.config.crawler.request_delay_ms);
            let concurrency = self.config.crawler.max_concurrent.max(1);

            let mut files = Vec::with_capacity(classified.files.len());
            {
                // bounded fan-out per folder; buffered keeps page order
                let pending: Vec<_> = classified
                    .files
                    .iter()
                    .map(|link| {
                        let prev = prev_files.get(link.url.as_str()).copied();
                        self.resolve_file(link, &local_path, prev)
                    })
                    .collect();
                let mut resolved = stream::iter(pending).buffered(concurrency);

                while let Some(entry) = resolved.next().await {
                    files.push(entry);
                    if delay > Duration::ZERO {
                        tokio::time::sleep(delay).await;
                    }
                }
            }

            let prev_dirs: HashMap<&str, &FolderNode> = previous
                .map(|p| p.folders.iter().map(|d| (d.url.as_str(), d)).collect())
                .unwrap_or_default();

            let mut folders = Vec::with_capacity(classified.folders.len());
            for link in &classified.folders {
                let child = self
                    .build_folder(
                        link.url.clone(),
                        local_path.join(&link.name),
                        link.name.clone(),
                        prev_dirs.get(link.url.as_str()).copied(),
                        depth + 1,
                    )
                    .await?;
                folders.push(child);
            }

            Ok(FolderNode {
                url,
                name,
                local_path,
                folders,
                files,
            })
        }
        .boxed()
    }

    /// Decide whether a file needs re-downloading and produce its entry.
    async fn resolve_file(
        &self,
        link: &Link,
        dir: &Path,
        previous: Option<&FileEntry>,
    ) -> FileEntry {
        let mut entry = FileEntry {
            url: link.url.clone(),
            name: link.name.clone(),
            digest: None,
            etag: None,
        };

        if self.config.site.is_drive_url(&link.url) {
            // the file host exposes no reliable change token, always refetch
            match self.download_and_digest(&link.url, dir).await {
                Ok(digest) => entry.digest = Some(digest),
                Err(e) => {
                    log::warn!("Skipping file {}: {e}", link.url);
                    entry.digest = previous.and_then(|p| p.digest.clone());
                }
            }
            return entry;
        }

        let etag = self.site.probe_etag(&link.url).await;

        if let (Some(prev), Some(current)) = (previous, etag.as_deref()) {
            if prev.etag.as_deref() == Some(current) {
                entry.digest = prev.digest.clone();
                entry.etag = prev.etag.clone();
                return entry;
            }
        }

        match self.download_and_digest(&link.url, dir).await {
            Ok(digest) => {
                entry.digest = Some(digest);
                entry.etag = etag;
            }
            Err(e) => {
                // digest and etag must describe the same fetch, so the
                // freshly probed etag is discarded with the failed download
                log::warn!("Skipping file {}: {e}", link.url);
                if let Some(prev) = previous {
                    entry.digest = prev.digest.clone();
                    entry.etag = prev.etag.clone();
                }
            }
        }

        entry
    }

    async fn download_and_digest(&self, url: &str, dir: &Path) -> Result<String> {
        let path = self.site.download(url, dir).await?;
        hash::sha256_file(&path).await
    }
}
