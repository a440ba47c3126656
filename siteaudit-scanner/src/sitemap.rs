//! Best-effort `/sitemap.xml` discovery.
//!
//! Sitemaps in the wild are frequently invalid XML, so `<loc>` entries are
//! harvested by pattern matching instead of a strict parser. Every failure
//! mode is reported as a [`SitemapUnavailable`] value, never as an error.

use crate::fetch::Fetcher;
use crate::url_utils::origin_of;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Upper bound on raw sitemap URLs kept for the technical summary.
pub const MAX_SITEMAP_URLS: usize = 200;

static LOC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<loc>\s*([^<\s]+)\s*</loc>").expect("static sitemap pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapUnavailable {
    Fetch(String),
    Status(u16),
    ContentType(String),
    Empty,
}

impl fmt::Display for SitemapUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SitemapUnavailable::Fetch(e) => write!(f, "fetch failed: {}", e),
            SitemapUnavailable::Status(code) => write!(f, "unexpected status {}", code),
            SitemapUnavailable::ContentType(ct) => write!(f, "not XML (content-type: {:?})", ct),
            SitemapUnavailable::Empty => write!(f, "no <loc> entries"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapOutcome {
    /// Deduplicated `<loc>` values in document order.
    Parsed(Vec<String>),
    Unavailable(SitemapUnavailable),
}

impl SitemapOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, SitemapOutcome::Parsed(_))
    }

    pub fn urls(&self) -> &[String] {
        match self {
            SitemapOutcome::Parsed(urls) => urls,
            SitemapOutcome::Unavailable(_) => &[],
        }
    }
}

pub fn sitemap_url_for(root: &str) -> Option<String> {
    origin_of(root)
        .ok()
        .map(|origin| format!("{}/sitemap.xml", origin))
}

/// Extract every `<loc>` value, deduplicated, first occurrence wins.
pub fn parse_sitemap_locs(xml: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    LOC_PATTERN
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|loc| seen.insert(loc.clone()))
        .collect()
}

/// Fetch and parse `{origin}/sitemap.xml` for the given root URL.
pub async fn discover_sitemap<F: Fetcher>(fetcher: &F, root: &str) -> SitemapOutcome {
    let Some(sitemap_url) = sitemap_url_for(root) else {
        return SitemapOutcome::Unavailable(SitemapUnavailable::Fetch(format!(
            "cannot derive origin from {}",
            root
        )));
    };

    debug!("Looking for sitemap at {}", sitemap_url);

    let response = match fetcher.fetch(&sitemap_url).await {
        Ok(response) => response,
        Err(e) => return SitemapOutcome::Unavailable(SitemapUnavailable::Fetch(e.to_string())),
    };

    if !response.is_success() {
        return SitemapOutcome::Unavailable(SitemapUnavailable::Status(response.status));
    }

    if !response.content_type.to_ascii_lowercase().contains("xml") {
        return SitemapOutcome::Unavailable(SitemapUnavailable::ContentType(response.content_type));
    }

    let urls = parse_sitemap_locs(&response.text);
    if urls.is_empty() {
        return SitemapOutcome::Unavailable(SitemapUnavailable::Empty);
    }

    info!("Sitemap at {} lists {} URLs", sitemap_url, urls.len());
    SitemapOutcome::Parsed(urls)
}
