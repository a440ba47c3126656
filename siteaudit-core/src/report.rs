// Report generation from an audit result

use crate::model::{AuditResult, Finding, Severity};
use serde::{Deserialize, Serialize};
use siteaudit_scanner::PageRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────────────────────────";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }
}

pub fn severity_counts(findings: &[Finding]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();

    for finding in findings {
        match finding.severity {
            Severity::Critical => counts.critical += 1,
            Severity::High => counts.high += 1,
            Severity::Medium => counts.medium += 1,
            Severity::Low => counts.low += 1,
            Severity::Info => counts.info += 1,
        }
    }

    counts
}

/// Findings ordered most severe first, stable within a severity.
fn sorted_findings(findings: &[Finding]) -> Vec<&Finding> {
    let mut sorted: Vec<&Finding> = findings.iter().collect();
    sorted.sort_by_key(|f| f.severity);
    sorted
}

pub fn generate_report(audit: &AuditResult, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(audit)),
        ReportFormat::Markdown => Ok(generate_markdown_report(audit)),
        ReportFormat::Json => generate_json_report(audit),
    }
}

fn section(report: &mut String, title: &str) {
    report.push_str(RULE);
    report.push('\n');
    report.push_str(title);
    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");
}

pub fn generate_text_report(audit: &AuditResult) -> String {
    let mut report = String::new();
    let site = &audit.site;

    // Header
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                            SITE AUDIT REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("Audit ID:     {}\n", audit.audit_id));
    report.push_str(&format!("Site:         {}\n", site.root_url));
    report.push_str(&format!("Name:         {}\n", or_dash(site.detected_name.as_deref())));
    report.push_str(&format!("Pages:        {}\n", audit.pages.len()));
    report.push_str(&format!("Links:        {}\n", audit.link_graph.len()));
    report.push('\n');

    section(&mut report, "TECHNICAL");
    report.push_str(&format!(
        "Sitemap:      {}\n",
        if site.technical.has_sitemap {
            format!("yes ({} URLs)", site.technical.sitemap_urls.len())
        } else {
            "no".to_string()
        }
    ));
    let unreachable = audit.pages.iter().filter(|p| !p.is_reachable()).count();
    let noindex = audit
        .pages
        .iter()
        .filter(|p| p.indexability.noindex == Some(true))
        .count();
    report.push_str(&format!("Unreachable:  {}\n", unreachable));
    report.push_str(&format!("Noindex:      {}\n", noindex));
    report.push('\n');

    section(&mut report, "CONTACT");
    report.push_str(&format!("Email:        {}\n", or_dash(site.contact.email.as_deref())));
    report.push_str(&format!("Phone:        {}\n", or_dash(site.contact.phone.as_deref())));
    report.push('\n');

    if !site.detected_services.is_empty() {
        section(&mut report, "SERVICES");
        for service in &site.detected_services {
            report.push_str(&format!("  • {}\n", service));
        }
        report.push('\n');
    }

    section(&mut report, "FINDINGS");
    let counts = severity_counts(&audit.findings);
    report.push_str(&format!("Total Findings: {}\n\n", counts.total()));

    for (label, count) in [
        ("[CRITICAL]", counts.critical),
        ("[HIGH]    ", counts.high),
        ("[MEDIUM]  ", counts.medium),
        ("[LOW]     ", counts.low),
        ("[INFO]    ", counts.info),
    ] {
        if count > 0 {
            report.push_str(&format!("  {} {}\n", label, count));
        }
    }
    report.push('\n');

    for (idx, finding) in sorted_findings(&audit.findings).into_iter().enumerate() {
        report.push_str(&format!("[{}] {}\n", idx + 1, format_finding_code(&finding.code)));
        report.push_str(&format!("Severity:     {}\n", finding.severity.as_str().to_uppercase()));
        report.push_str(&format!("Code:         {}\n", finding.code));
        report.push_str("\nDescription:\n");
        report.push_str(&wrap_text(&finding.message, 80, "  "));
        report.push('\n');

        if !finding.evidence.is_empty() {
            report.push_str("Evidence:\n");
            for evidence in &finding.evidence {
                report.push_str(&format!("  {} ({})\n", evidence.url, evidence.field));
                if let Some(ref snippet) = evidence.snippet {
                    report.push_str(&wrap_text(snippet, 80, "    "));
                }
            }
            report.push('\n');
        }

        report.push_str(THIN_RULE);
        report.push_str("\n\n");
    }

    section(&mut report, "PAGES");
    report.push_str(&generate_page_list(&audit.pages));
    report.push('\n');

    // Footer
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                              End of Report\n");
    report.push_str(RULE);
    report.push_str("\n\nGenerated by siteaudit\n\n");

    report
}

pub fn generate_markdown_report(audit: &AuditResult) -> String {
    let mut report = String::new();
    let site = &audit.site;

    report.push_str(&format!("# Site audit: {}\n\n", site.root_url));
    report.push_str(&format!("- **Audit ID:** `{}`\n", audit.audit_id));
    report.push_str(&format!("- **Name:** {}\n", or_dash(site.detected_name.as_deref())));
    report.push_str(&format!("- **Pages crawled:** {}\n", audit.pages.len()));
    report.push_str(&format!(
        "- **Sitemap:** {}\n",
        if site.technical.has_sitemap { "yes" } else { "no" }
    ));
    report.push_str(&format!("- **Email:** {}\n", or_dash(site.contact.email.as_deref())));
    report.push_str(&format!("- **Phone:** {}\n\n", or_dash(site.contact.phone.as_deref())));

    if !site.detected_services.is_empty() {
        report.push_str("## Services\n\n");
        for service in &site.detected_services {
            report.push_str(&format!("- {}\n", service));
        }
        report.push('\n');
    }

    report.push_str("## Findings\n\n");
    if audit.findings.is_empty() {
        report.push_str("No findings.\n\n");
    } else {
        report.push_str("| Severity | Code | Message |\n");
        report.push_str("|----------|------|---------|\n");
        for finding in sorted_findings(&audit.findings) {
            report.push_str(&format!(
                "| {} | `{}` | {} |\n",
                finding.severity.as_str(),
                finding.code,
                escape_table_cell(&finding.message)
            ));
        }
        report.push('\n');
    }

    report.push_str("## Pages\n\n");
    report.push_str("| Status | URL | Type | Title |\n");
    report.push_str("|--------|-----|------|-------|\n");
    for page in &audit.pages {
        report.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            page.status_code,
            page.url,
            page.detected_page_type.map(|t| t.as_str()).unwrap_or("-"),
            escape_table_cell(page.title.as_deref().unwrap_or("-"))
        ));
    }

    report
}

pub fn generate_json_report(audit: &AuditResult) -> Result<String, serde_json::Error> {
    let counts = severity_counts(&audit.findings);
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "siteaudit",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "total_pages": audit.pages.len(),
                "total_links": audit.link_graph.len(),
                "total_findings": counts.total(),
                "severity_breakdown": counts
            },
            "audit": audit
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn format_finding_code(code: &str) -> String {
    code.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();
    let available = width.saturating_sub(indent.len());

    for word in text.split_whitespace() {
        if !current_line.is_empty() && current_line.len() + word.len() + 1 > available {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}

fn generate_page_list(pages: &[PageRecord]) -> String {
    if pages.is_empty() {
        return "  (empty)\n".to_string();
    }

    let mut result = String::new();

    for (i, page) in pages.iter().enumerate() {
        let prefix = if i == pages.len() - 1 { "└── " } else { "├── " };

        let status_indicator = match page.status_code {
            200..=299 => "✓",
            300..=399 => "→",
            400..=499 => "⚠",
            500..=599 => "✗",
            _ => "?",
        };

        let page_type = page
            .detected_page_type
            .map(|t| format!(" ({})", t.as_str()))
            .unwrap_or_default();

        result.push_str(&format!(
            "{}{}  [{} {}]{}\n",
            prefix, page.url, status_indicator, page.status_code, page_type
        ));
    }

    result
}
