//! Per-page content extraction.
//!
//! [`extract_page`] turns one HTML document into the extracted fields of a
//! [`PageRecord`] plus every resolvable outbound link. Site-boundary
//! filtering of those links happens in the crawler.

use crate::result::{Indexability, PageRecord, PageType};
use crate::url_utils::strip_tracking_params;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

pub const MAX_SNIPPET_CHARS: usize = 2500;

/// Subtrees whose text never reaches the snippet.
const HIDDEN_TEXT_TAGS: [&str; 5] = ["script", "style", "noscript", "nav", "footer"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static META_ROBOTS: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[name="robots"]"#));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| selector(r#"link[rel="canonical"]"#));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static H2: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));

/// Everything extracted from one HTML document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub canonical: Option<String>,
    pub indexability: Indexability,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1: Option<String>,
    pub h2: Vec<String>,
    pub text_snippet: Option<String>,
    pub detected_page_type: Option<PageType>,
    /// Absolute, tracking-stripped, deduplicated link candidates.
    pub links: Vec<String>,
    pub schema_jsonld: Vec<Value>,
}

impl ExtractedPage {
    pub fn into_page_record(
        self,
        url: String,
        status_code: u16,
        internal_links: Vec<String>,
    ) -> PageRecord {
        PageRecord {
            url,
            status_code,
            canonical: self.canonical,
            indexability: self.indexability,
            title: self.title,
            meta_description: self.meta_description,
            h1: self.h1,
            h2: self.h2,
            text_snippet: self.text_snippet,
            detected_page_type: self.detected_page_type,
            internal_links,
            schema_jsonld: self.schema_jsonld,
        }
    }
}

pub fn extract_page(html: &str, page_url: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let robots_meta = first_attr(&document, &META_ROBOTS, "content")
        .map(str::trim)
        .and_then(non_empty);
    let noindex = robots_meta
        .as_ref()
        .map(|content| content.to_ascii_lowercase().contains("noindex"));

    ExtractedPage {
        canonical: first_attr(&document, &CANONICAL, "href").and_then(non_empty),
        indexability: Indexability {
            noindex,
            robots_meta,
        },
        title: first_text(&document, &TITLE),
        meta_description: first_attr(&document, &META_DESCRIPTION, "content")
            .map(str::trim)
            .and_then(non_empty),
        h1: first_text(&document, &H1),
        h2: unique_texts(&document, &H2),
        text_snippet: text_snippet(&document),
        detected_page_type: classify_page_type(page_url),
        links: extract_links(&document, page_url),
        schema_jsonld: extract_json_ld(&document, page_url),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn first_attr<'a>(document: &'a Html, selector: &Selector, attr: &str) -> Option<&'a str> {
    document
        .select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
}

fn unique_texts(document: &Html, selector: &Selector) -> Vec<String> {
    let mut seen = HashSet::new();
    document
        .select(selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .filter(|text| seen.insert(text.clone()))
        .collect()
}

fn extract_json_ld(document: &Html, page_url: &str) -> Vec<Value> {
    let mut blocks = Vec::new();

    for element in document.select(&JSON_LD) {
        let raw = element.text().collect::<String>();
        if raw.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => blocks.push(value),
            Err(e) => debug!("Skipping malformed JSON-LD block on {}: {}", page_url, e),
        }
    }

    blocks
}

fn extract_links(document: &Html, page_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&ANCHOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Ok(mut resolved) = base.join(href) else {
            debug!("Skipping unresolvable href {:?} on {}", href, page_url);
            continue;
        };

        strip_tracking_params(&mut resolved);
        let link = resolved.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

fn text_snippet(document: &Html) -> Option<String> {
    let root = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::new();
    collect_visible_text(root, &mut raw);

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    Some(collapsed.chars().take(MAX_SNIPPET_CHARS).collect())
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if HIDDEN_TEXT_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_visible_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

// Page-type detection. Each detector looks at the lower-cased URL on its own;
// they run in order and a later match overwrites an earlier one.
// Word boundaries are ASCII-only, so `/aboutü` still counts as about.

pub type PageTypeDetector = fn(&str) -> Option<PageType>;

pub const PAGE_TYPE_DETECTORS: [PageTypeDetector; 6] = [
    detect_home,
    detect_about,
    detect_contact,
    detect_service,
    detect_faq,
    detect_blog,
];

static ABOUT_PATH: LazyLock<Regex> = LazyLock::new(|| path_pattern(r"/about(?-u:\b)"));
static CONTACT_PATH: LazyLock<Regex> = LazyLock::new(|| path_pattern(r"/contact(?-u:\b)"));
static SERVICE_PATH: LazyLock<Regex> = LazyLock::new(|| path_pattern(r"/services?(?-u:\b)"));
static FAQ_PATH: LazyLock<Regex> = LazyLock::new(|| path_pattern(r"/faq(?-u:\b)"));
static BLOG_PATH: LazyLock<Regex> = LazyLock::new(|| path_pattern(r"/blog(?-u:\b)"));

fn path_pattern(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static path pattern is valid")
}

fn path_matches(url: &str, pattern: &Regex) -> bool {
    Url::parse(url)
        .map(|parsed| pattern.is_match(parsed.path()))
        .unwrap_or(false)
}

pub fn classify_page_type(url: &str) -> Option<PageType> {
    let lower = url.to_lowercase();
    PAGE_TYPE_DETECTORS
        .iter()
        .fold(None, |current, detect| detect(&lower).or(current))
}

pub fn detect_home(url: &str) -> Option<PageType> {
    let is_origin_root = Url::parse(url)
        .map(|parsed| format!("{}/", parsed.origin().ascii_serialization()) == url)
        .unwrap_or(false);

    (url.ends_with('/') || is_origin_root).then_some(PageType::Home)
}

pub fn detect_about(url: &str) -> Option<PageType> {
    path_matches(url, &ABOUT_PATH).then_some(PageType::About)
}

pub fn detect_contact(url: &str) -> Option<PageType> {
    path_matches(url, &CONTACT_PATH).then_some(PageType::Contact)
}

pub fn detect_service(url: &str) -> Option<PageType> {
    path_matches(url, &SERVICE_PATH).then_some(PageType::Service)
}

pub fn detect_faq(url: &str) -> Option<PageType> {
    path_matches(url, &FAQ_PATH).then_some(PageType::Faq)
}

pub fn detect_blog(url: &str) -> Option<PageType> {
    path_matches(url, &BLOG_PATH).then_some(PageType::Blog)
}
