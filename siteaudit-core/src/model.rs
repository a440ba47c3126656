use serde::{Deserialize, Serialize};
use siteaudit_scanner::{LinkEdge, PageRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

/// Pointer to the data a finding was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub url: String,
    pub snippet: Option<String>,
    /// Dotted path of the field inside the audit result, e.g. `site.technical.has_sitemap`.
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub evidence: Vec<Evidence>,
}

/// Address fields are part of the schema but are never detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalSummary {
    pub has_sitemap: bool,
    pub sitemap_urls: Vec<String>,
    /// Never populated; robots.txt is not consulted.
    pub robots_txt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub root_url: String,
    pub detected_name: Option<String>,
    pub detected_industry: Option<String>,
    pub detected_services: Vec<String>,
    pub contact: ContactInfo,
    pub technical: TechnicalSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub audit_id: String,
    pub site: SiteSummary,
    pub pages: Vec<PageRecord>,
    pub link_graph: Vec<LinkEdge>,
    pub findings: Vec<Finding>,
}
