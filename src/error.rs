// src/error.rs

//! Unified error handling for coursewatch.

use std::fmt;

use thiserror::Error;

/// Result type alias for coursewatch operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration or course-list error, fatal to the whole cycle
    #[error("Configuration error: {0}")]
    Config(String),

    /// Still on the login page after a session refresh
    #[error("Authentication failed for {url}")]
    Auth { url: String },

    /// A folder page could not be fetched, fatal to that course's cycle
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// A file body transfer failed, degraded per file
    #[error("Download error for {url}: {message}")]
    Download { url: String, message: String },

    /// Notification dispatch failed
    #[error("Notify error: {0}")]
    Notify(String),

    /// Crawling error
    #[error("Crawl error for {context}: {message}")]
    Crawl { context: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an authentication error.
    pub fn auth(url: impl Into<String>) -> Self {
        Self::Auth { url: url.into() }
    }

    /// Create a fetch error with the page URL as context.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a download error with the file URL as context.
    pub fn download(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Download {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a notification error.
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify(message.into())
    }

    /// Create a crawl error with context.
    pub fn crawl(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Crawl {
            context: context.into(),
            message: message.to_string(),
        }
    }
}
