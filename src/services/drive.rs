// src/services/drive.rs

//! Google Drive download indirection.
//!
//! Course pages sometimes link files through Google Drive rather than the
//! site's own file module. Those links resolve to a sharing page, not the
//! file body, so downloads go through the direct-download endpoint with the
//! file id extracted from the sharing URL. The saved name comes from the
//! `Content-Disposition` header, with the sharing page title as fallback.

use std::path::{Path, PathBuf};

use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{AppError, Result};

const FALLBACK_NAME: &str = "downloaded_file";

/// Extract the stable file id from a Drive sharing URL.
///
/// Handles both the `/file/d/<id>` and the `open?id=<id>` forms; anything
/// else passes through unchanged.
pub fn extract_file_id(url: &str) -> String {
    if let Some(caps) = Regex::new(r"drive\.google\.com/file/d/([A-Za-z0-9_-]+)")
        .ok()
        .and_then(|re| re.captures(url))
    {
        return caps[1].to_string();
    }

    if let Some(value) = query_param(url, "id") {
        return value;
    }

    url.to_string()
}

/// Extract the `resourcekey` query parameter, if present.
pub fn extract_resource_key(url: &str) -> Option<String> {
    query_param(url, "resourcekey")
}

/// Extract the `authuser` query parameter, if present.
pub fn extract_auth_user(url: &str) -> Option<String> {
    query_param(url, "authuser")
}

/// Build the direct-download endpoint for a sharing URL.
pub fn direct_download_url(url: &str) -> String {
    let mut direct = format!(
        "https://drive.usercontent.google.com/download?id={}&export=download",
        extract_file_id(url)
    );
    if let Some(key) = extract_resource_key(url) {
        direct.push_str(&format!("&resourcekey={key}"));
    }
    if let Some(user) = extract_auth_user(url) {
        direct.push_str(&format!("&authuser={user}"));
    }
    direct
}

/// Download a Drive-hosted file into `dest_dir` and return the saved path.
pub async fn download(client: &Client, url: &str, dest_dir: &Path) -> Result<PathBuf> {
    let direct = direct_download_url(url);
    let mut response = client
        .get(&direct)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::download(url, e))?;

    let name = match response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_disposition_name)
    {
        Some(name) => name,
        None => file_name_from_title(client, url).await,
    };

    tokio::fs::create_dir_all(dest_dir).await?;
    let dest = dest_dir.join(&name);
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

/// Pull a file name out of a `Content-Disposition` header value.
fn parse_disposition_name(value: &str) -> Option<String> {
    let (_, rest) = value.split_once("filename=")?;
    let name = rest.split(';').next().unwrap_or(rest).trim().trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}

/// Derive a file name from the sharing page's title.
async fn file_name_from_title(client: &Client, url: &str) -> String {
    let body = match client.get(url).send().await {
        Ok(response) => match response.text().await {
            Ok(body) => body,
            Err(_) => return FALLBACK_NAME.to_string(),
        },
        Err(e) => {
            log::warn!("Could not fetch sharing page for file name: {e}");
            return FALLBACK_NAME.to_string();
        }
    };

    title_to_name(&body)
}

fn title_to_name(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").expect("static selector");

    let title: String = match document.select(&selector).next() {
        Some(element) => element.text().collect(),
        None => return FALLBACK_NAME.to_string(),
    };
    let title = title.replace("- Google Drive", "");
    let title = title.trim();

    if title.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        title.to_string()
    }
}

fn query_param(url: &str, key: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.to_string())
}
