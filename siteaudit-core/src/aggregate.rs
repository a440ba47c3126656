//! Site-level summary derived from a finished crawl.
//!
//! Detection is split into small pure detectors so each heuristic can be
//! tested alone and new ones appended without touching [`Aggregator`].

use crate::model::{
    AuditResult, ContactInfo, Evidence, Finding, Severity, SiteSummary, TechnicalSummary,
};
use regex::Regex;
use siteaudit_scanner::sitemap::MAX_SITEMAP_URLS;
use siteaudit_scanner::{CrawlOutput, PageRecord, PageType, SitemapOutcome};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

pub const MAX_SERVICES: usize = 15;
pub const MAX_H2_PER_SERVICE_PAGE: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").expect("static email pattern is valid")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?[0-9][0-9\s().-]{7,}[0-9]").expect("static phone pattern is valid")
});

/// Text → contact value. Returns the first match in the text, if any.
pub type TextDetector = fn(&str) -> Option<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Email,
    Phone,
}

/// Contact detectors in evaluation order.
pub const CONTACT_DETECTORS: [(ContactField, TextDetector); 2] = [
    (ContactField::Email, detect_email),
    (ContactField::Phone, detect_phone),
];

pub fn detect_email(text: &str) -> Option<String> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str().to_string())
}

pub fn detect_phone(text: &str) -> Option<String> {
    PHONE_PATTERN.find(text).map(|m| m.as_str().to_string())
}

impl ContactInfo {
    fn slot_mut(&mut self, field: ContactField) -> &mut Option<String> {
        match field {
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
        }
    }
}

/// First non-empty `h1` in crawl order.
pub fn detect_name(pages: &[PageRecord]) -> Option<String> {
    pages.iter().find_map(|page| page.h1.clone())
}

/// Scan snippets in crawl order; each field locks on its first match.
pub fn detect_contact(pages: &[PageRecord]) -> ContactInfo {
    let mut contact = ContactInfo::default();

    for page in pages {
        let Some(snippet) = page.text_snippet.as_deref() else {
            continue;
        };

        for (field, detect) in CONTACT_DETECTORS {
            let slot = contact.slot_mut(field);
            if slot.is_none() {
                *slot = detect(snippet);
            }
        }
    }

    contact
}

pub fn detect_services(pages: &[PageRecord]) -> Vec<String> {
    let mut seen = HashSet::new();

    pages
        .iter()
        .filter(|page| page.detected_page_type == Some(PageType::Service))
        .flat_map(|page| {
            page.h1
                .iter()
                .chain(page.h2.iter().take(MAX_H2_PER_SERVICE_PAGE))
        })
        .filter(|name| seen.insert(name.as_str()))
        .take(MAX_SERVICES)
        .cloned()
        .collect()
}

/// A sitemap counts only when at least one of its entries is on the audited site.
/// `sitemap_urls` keeps the raw entries either way.
pub fn technical_summary(sitemap: &SitemapOutcome, same_site_entries: usize) -> TechnicalSummary {
    TechnicalSummary {
        has_sitemap: sitemap.is_available() && same_site_entries > 0,
        sitemap_urls: sitemap.urls().iter().take(MAX_SITEMAP_URLS).cloned().collect(),
        robots_txt: None,
    }
}

/// One check over the completed crawl.
pub trait FindingRule: Send + Sync {
    fn code(&self) -> &'static str;

    fn evaluate(&self, site: &SiteSummary, pages: &[PageRecord]) -> Vec<Finding>;
}

pub struct MissingSitemap;

impl FindingRule for MissingSitemap {
    fn code(&self) -> &'static str {
        "missing_sitemap"
    }

    fn evaluate(&self, site: &SiteSummary, _pages: &[PageRecord]) -> Vec<Finding> {
        if site.technical.has_sitemap {
            return Vec::new();
        }

        vec![Finding {
            code: self.code().to_string(),
            severity: Severity::Medium,
            message: "No sitemap detected at /sitemap.xml (or it was empty/unreadable).".to_string(),
            evidence: vec![Evidence {
                url: site.root_url.clone(),
                snippet: None,
                field: "site.technical.has_sitemap".to_string(),
            }],
        }]
    }
}

pub struct Aggregator {
    rules: Vec<Box<dyn FindingRule>>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            rules: vec![Box::new(MissingSitemap)],
        }
    }
}

impl Aggregator {
    /// Aggregator with no finding rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: Box<dyn FindingRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn summarize(
        &self,
        root_url: &str,
        pages: &[PageRecord],
        sitemap: &SitemapOutcome,
        sitemap_same_site: usize,
    ) -> SiteSummary {
        SiteSummary {
            root_url: root_url.to_string(),
            detected_name: detect_name(pages),
            detected_industry: None,
            detected_services: detect_services(pages),
            contact: detect_contact(pages),
            technical: technical_summary(sitemap, sitemap_same_site),
        }
    }

    pub fn findings(&self, site: &SiteSummary, pages: &[PageRecord]) -> Vec<Finding> {
        self.rules
            .iter()
            .flat_map(|rule| {
                let findings = rule.evaluate(site, pages);
                debug!("Rule {} produced {} findings", rule.code(), findings.len());
                findings
            })
            .collect()
    }

    pub fn aggregate(&self, audit_id: String, output: CrawlOutput) -> AuditResult {
        let site = self.summarize(
            &output.root_url,
            &output.pages,
            &output.sitemap,
            output.sitemap_same_site,
        );
        let findings = self.findings(&site, &output.pages);

        AuditResult {
            audit_id,
            site,
            pages: output.pages,
            link_graph: output.link_graph,
            findings,
        }
    }
}
