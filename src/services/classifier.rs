// src/services/classifier.rs

//! Link classifier.
//!
//! Partitions the anchors of a fetched folder page into file links and
//! subfolder links, after dropping navigation and meta links. Pure given
//! its inputs; fetching and authentication live in `site`.

use url::Url;

use crate::error::Result;
use crate::models::{Config, SiteConfig};
use crate::utils::url::resolve;

/// An `(href, text)` anchor pair extracted from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

impl Anchor {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// A classified link: absolute URL plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub name: String,
}

/// Classification result for one page, in page order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Classified {
    pub files: Vec<Link>,
    pub folders: Vec<Link>,
}

/// Classifies anchors into files and subfolders.
pub struct LinkClassifier {
    site: SiteConfig,
    base: Url,
}

impl LinkClassifier {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.site.base_url)?;
        Ok(Self {
            site: config.site.clone(),
            base,
        })
    }

    /// Classify the anchors of the page at `page_url`.
    pub fn classify(&self, page_url: &str, anchors: &[Anchor]) -> Classified {
        let mut out = Classified::default();

        for anchor in anchors {
            let href = anchor.href.trim();
            if href.is_empty() {
                continue;
            }

            let absolute = resolve(&self.base, href);
            if absolute == page_url {
                // self-referential link back to the page we just fetched
                continue;
            }
            if self.site.exclude_patterns.iter().any(|p| href.contains(p)) {
                continue;
            }

            if self.site.is_drive_url(href) {
                if self.site.is_drive_file_url(href) {
                    out.files.push(self.link(&absolute, &anchor.text));
                } else {
                    // folders, account and help pages on the file host
                    log::debug!("Skipping non-file third-party link: {href}");
                }
            } else if looks_like_file(href) {
                out.files.push(self.link(&absolute, &anchor.text));
            } else if !href.contains(&self.site.download_marker) {
                out.folders.push(self.link(&absolute, &anchor.text));
            }
        }

        out
    }

    fn link(&self, absolute: &str, text: &str) -> Link {
        let name = text.trim();
        let name = if name.is_empty() {
            crate::utils::url::file_name(absolute, "unnamed")
        } else {
            name.to_string()
        };
        Link {
            url: absolute.to_string(),
            name,
        }
    }
}

/// Extension heuristic: a dot within the href's last six characters.
///
/// Kept for compatibility with the legacy classifier; isolated here so a
/// content-type based rule can replace it without touching the crawler.
fn looks_like_file(href: &str) -> bool {
    href.chars().rev().take(6).any(|c| c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LinkClassifier {
        LinkClassifier::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_classify_course_page() {
        let page_url = "https://eclass.aueb.gr/modules/document/?course=INF100";
        let anchors = [
            Anchor::new("/modules/document/?course=INF100&openDir=/Labs/", "Labs"),
            Anchor::new("index.php?logout=yes", "Logout"),
            Anchor::new(
                "/modules/document/file.php?id=9&download=report.pdf",
                "report.pdf",
            ),
        ];

        let classified = classifier().classify(page_url, &anchors);

        assert_eq!(
            classified.folders,
            vec![Link {
                url: "https://eclass.aueb.gr/modules/document/?course=INF100&openDir=/Labs/"
                    .to_string(),
                name: "Labs".to_string(),
            }]
        );
        assert_eq!(
            classified.files,
            vec![Link {
                url: "https://eclass.aueb.gr/modules/document/file.php?id=9&download=report.pdf"
                    .to_string(),
                name: "report.pdf".to_string(),
            }]
        );
    }

    #[test]
    fn test_self_link_excluded() {
        let page_url = "https://eclass.aueb.gr/modules/document/?course=INF100";
        let anchors = [Anchor::new("/modules/document/?course=INF100", "Documents")];

        let classified = classifier().classify(page_url, &anchors);
        assert!(classified.files.is_empty());
        assert!(classified.folders.is_empty());
    }

    #[test]
    fn test_short_href_is_not_a_file() {
        let anchors = [Anchor::new("x", "x")];
        let classified = classifier().classify("https://eclass.aueb.gr/page", &anchors);
        assert!(classified.files.is_empty());
        assert_eq!(classified.folders.len(), 1);
    }

    #[test]
    fn test_drive_file_accepted_folder_skipped() {
        let anchors = [
            Anchor::new("https://drive.google.com/file/d/abc123/view", "notes.pdf"),
            Anchor::new("https://drive.google.com/drive/folders/xyz", "shared"),
            Anchor::new("https://accounts.google.com/signin", "sign in"),
        ];

        let classified = classifier().classify("https://eclass.aueb.gr/page", &anchors);
        assert_eq!(classified.files.len(), 1);
        assert_eq!(classified.files[0].name, "notes.pdf");
        assert!(classified.folders.is_empty());
    }

    #[test]
    fn test_download_marker_skipped() {
        let anchors = [Anchor::new(
            "/modules/document/index.php?course=INF100&download=/Labs",
            "Save",
        )];

        let classified = classifier().classify("https://eclass.aueb.gr/page", &anchors);
        assert!(classified.files.is_empty());
        assert!(classified.folders.is_empty());
    }

    #[test]
    fn test_exclusion_patterns() {
        let anchors = [
            Anchor::new("/?login_page=1", "Login"),
            Anchor::new("/modules/document/?course=INF100&sort=name", "Name"),
            Anchor::new("/info/terms.php", "Terms of use"),
        ];

        let classified = classifier().classify("https://eclass.aueb.gr/page", &anchors);
        assert!(classified.files.is_empty());
        assert!(classified.folders.is_empty());
    }

    #[test]
    fn test_relative_href_resolved_to_base_origin() {
        let anchors = [Anchor::new("/modules/document/?course=INF100&openDir=/A/", "A")];
        let classified = classifier().classify("https://eclass.aueb.gr/other", &anchors);
        assert!(classified.folders[0].url.starts_with("https://eclass.aueb.gr/"));
    }

    #[test]
    fn test_empty_link_text_falls_back_to_url_name() {
        let anchors = [Anchor::new("/docs/report.pdf", "  ")];
        let classified = classifier().classify("https://eclass.aueb.gr/page", &anchors);
        assert_eq!(classified.files[0].name, "report.pdf");
    }

    #[test]
    fn test_order_preserved() {
        let anchors = [
            Anchor::new("/docs/b.pdf", "b.pdf"),
            Anchor::new("/docs/a.pdf", "a.pdf"),
        ];
        let classified = classifier().classify("https://eclass.aueb.gr/page", &anchors);
        let names: Vec<&str> = classified.files.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["b.pdf", "a.pdf"]);
    }
}
