//! Application configuration structures.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::fs::load_toml;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Course-site layout: login, link classification, third-party hosts
    #[serde(default)]
    pub site: SiteConfig,

    /// Change notification settings
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_toml(path.as_ref())
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::config("crawler.max_concurrent must be > 0"));
        }
        if self.crawler.max_depth == 0 {
            return Err(AppError::config("crawler.max_depth must be > 0"));
        }
        if self.crawler.interval_secs == 0 {
            return Err(AppError::config("crawler.interval_secs must be > 0"));
        }
        url::Url::parse(&self.site.base_url)
            .map_err(|e| AppError::config(format!("site.base_url is invalid: {e}")))?;
        if self.site.login_marker.trim().is_empty() {
            return Err(AppError::config("site.login_marker is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between file requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent file downloads within a folder
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Maximum folder recursion depth
    #[serde(default = "defaults::max_depth")]
    pub max_depth: usize,

    /// Seconds between check cycles in watch mode
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
            max_depth: defaults::max_depth(),
            interval_secs: defaults::interval(),
        }
    }
}

/// Course-site layout settings: authentication, link filtering, and the
/// third-party file host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base origin of the course-management site
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Path of the login form, relative to the base origin
    #[serde(default = "defaults::login_path")]
    pub login_path: String,

    /// Account username
    #[serde(default)]
    pub username: String,

    /// Account password
    #[serde(default)]
    pub password: String,

    /// Text identifying a login page body
    #[serde(default = "defaults::login_marker")]
    pub login_marker: String,

    /// Text identifying a course-registration page body
    #[serde(default = "defaults::registration_marker")]
    pub registration_marker: String,

    /// Substrings excluding an anchor from classification
    #[serde(default = "defaults::exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Marker for raw-download links, which are never subfolders
    #[serde(default = "defaults::download_marker")]
    pub download_marker: String,

    /// Substring identifying third-party file-host URLs
    #[serde(default = "defaults::drive_host_marker")]
    pub drive_host_marker: String,

    /// Third-party URL forms accepted as file links
    #[serde(default = "defaults::drive_file_patterns")]
    pub drive_file_patterns: Vec<String>,
}

impl SiteConfig {
    /// Full URL of the login form.
    pub fn login_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.login_path
        )
    }

    /// Whether a URL is routed through the third-party file host.
    pub fn is_drive_url(&self, url: &str) -> bool {
        url.contains(&self.drive_host_marker)
    }

    /// Whether a third-party URL is one of the recognized file-link forms.
    pub fn is_drive_file_url(&self, url: &str) -> bool {
        self.drive_file_patterns.iter().any(|p| url.contains(p))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            login_path: defaults::login_path(),
            username: String::new(),
            password: String::new(),
            login_marker: defaults::login_marker(),
            registration_marker: defaults::registration_marker(),
            exclude_patterns: defaults::exclude_patterns(),
            download_marker: defaults::download_marker(),
            drive_host_marker: defaults::drive_host_marker(),
            drive_file_patterns: defaults::drive_file_patterns(),
        }
    }
}

/// Change notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifyConfig {
    /// Webhook endpoint receiving the per-course change lists as JSON.
    /// When absent, changes are only reported through the logger.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

mod defaults {
    pub fn user_agent() -> String {
        format!("coursewatch/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn request_delay() -> u64 {
        100
    }

    pub fn max_concurrent() -> usize {
        3
    }

    pub fn max_depth() -> usize {
        32
    }

    pub fn interval() -> u64 {
        3600
    }

    pub fn base_url() -> String {
        "https://eclass.aueb.gr".to_string()
    }

    pub fn login_path() -> String {
        "/?login_page=1".to_string()
    }

    pub fn login_marker() -> String {
        // "Login" on the e-class login page
        "Σύνδεση".to_string()
    }

    pub fn registration_marker() -> String {
        // "Register and enter the course"
        "Εγγραφή και είσοδος στο μάθημα".to_string()
    }

    pub fn exclude_patterns() -> Vec<String> {
        [
            "login",
            "logout",
            "&sort",
            "/info/",
            "/manuals/",
            "openDir=%2F",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    pub fn download_marker() -> String {
        "&download=/".to_string()
    }

    pub fn drive_host_marker() -> String {
        "google".to_string()
    }

    pub fn drive_file_patterns() -> Vec<String> {
        [
            "drive.google.com/file/",
            "drive.google.com/open",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.crawler.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_login_url() {
        let site = SiteConfig::default();
        assert_eq!(site.login_url(), "https://eclass.aueb.gr/?login_page=1");
    }

    #[test]
    fn test_drive_url_detection() {
        let site = SiteConfig::default();
        assert!(site.is_drive_url("https://drive.google.com/file/d/abc/view"));
        assert!(site.is_drive_file_url("https://drive.google.com/file/d/abc/view"));
        assert!(site.is_drive_file_url("https://drive.google.com/open?id=abc"));
        assert!(!site.is_drive_file_url("https://drive.google.com/drive/folders/xyz"));
        assert!(!site.is_drive_url("https://eclass.aueb.gr/modules/document/file.php?id=1"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            timeout_secs = 10

            [site]
            username = "student"
            password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.timeout_secs, 10);
        assert_eq!(config.crawler.max_concurrent, 3);
        assert_eq!(config.site.username, "student");
        assert_eq!(config.site.base_url, "https://eclass.aueb.gr");
    }
}
