use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse page classification derived from the URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Home,
    About,
    Contact,
    Service,
    Faq,
    Blog,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Home => "home",
            PageType::About => "about",
            PageType::Contact => "contact",
            PageType::Service => "service",
            PageType::Faq => "faq",
            PageType::Blog => "blog",
        }
    }
}

/// Robots meta state. Both fields are `None` when the page carries no
/// `<meta name="robots">` tag, so "unknown" stays distinct from "indexable".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indexability {
    pub noindex: Option<bool>,
    pub robots_meta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    /// 0 when the page could not be fetched at all.
    pub status_code: u16,
    pub canonical: Option<String>,
    pub indexability: Indexability,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1: Option<String>,
    pub h2: Vec<String>,
    pub text_snippet: Option<String>,
    pub detected_page_type: Option<PageType>,
    pub internal_links: Vec<String>,
    pub schema_jsonld: Vec<Value>,
}

impl PageRecord {
    pub fn new(url: String, status_code: u16) -> Self {
        Self {
            url,
            status_code,
            canonical: None,
            indexability: Indexability::default(),
            title: None,
            meta_description: None,
            h1: None,
            h2: Vec::new(),
            text_snippet: None,
            detected_page_type: None,
            internal_links: Vec::new(),
            schema_jsonld: Vec::new(),
        }
    }

    pub fn unreachable(url: String) -> Self {
        Self::new(url, 0)
    }

    pub fn is_reachable(&self) -> bool {
        self.status_code != 0
    }
}
