// src/utils/url.rs

//! URL manipulation utilities.

use percent_encoding::percent_decode_str;
use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract a percent-decoded file name from a URL's last path segment.
///
/// Falls back to the given default when the URL has no usable segment.
pub fn file_name(url: &str, default: &str) -> String {
    let name = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(|s| s.to_string()))
        })
        .map(|segment| percent_decode_str(&segment).decode_utf8_lossy().to_string())
        .unwrap_or_default();

    if name.is_empty() {
        default.to_string()
    } else {
        name
    }
}
