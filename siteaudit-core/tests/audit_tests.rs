// Tests for end-to-end audit orchestration

use siteaudit_core::audit::{extract_url_path, make_audit_id, run_audit};
use siteaudit_core::config::AuditConfig;
use siteaudit_core::error::AuditError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("http://example.com/"), "/");
    assert_eq!(extract_url_path("http://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(extract_url_path("http://example.com/api/v1/users"), "/api/v1/users");
}

#[test]
fn test_extract_url_path_with_query_and_fragment() {
    assert_eq!(extract_url_path("http://example.com/api?key=value#top"), "/api");
}

#[test]
fn test_extract_url_path_invalid_url() {
    assert_eq!(extract_url_path("not-a-url"), "not-a-url");
}

// ============================================================================
// Audit ID Tests
// ============================================================================

#[test]
fn test_make_audit_id_prefix() {
    let id = make_audit_id();
    assert!(id.starts_with("audit_"));
    assert!(id.chars().all(|c| c == '_' || c.is_ascii_alphanumeric()));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = AuditConfig::default();

    assert_eq!(config.max_pages, 25);
    assert!(!config.include_subdomains);
    assert_eq!(config.timeout_secs, 15);
    assert_eq!(config.seed_limit, 15);
    assert!(!config.show_progress);
    assert!(config.user_agent.starts_with("SiteAudit/"));
}

#[test]
fn test_config_builders() {
    let config = AuditConfig::default()
        .with_max_pages(3)
        .with_include_subdomains(true)
        .with_timeout(5)
        .with_progress(true);

    assert_eq!(config.max_pages, 3);
    assert!(config.include_subdomains);
    assert_eq!(config.timeout_secs, 5);
    assert!(config.show_progress);
}

// ============================================================================
// Orchestration Tests
// ============================================================================

#[tokio::test]
async fn test_run_audit_over_http() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                "<urlset><url><loc>{}/contact</loc></url><url><loc>https://elsewhere.test/</loc></url></urlset>",
                base
            ),
            "application/xml",
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><h1>Harbor Dental</h1><a href="/faq">FAQ</a></body></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><p>Reach us: desk@harbor.example</p></body></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/faq"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = AuditConfig::default().with_max_pages(10);
    let result = run_audit(&config, &base).await.unwrap();

    assert!(result.audit_id.starts_with("audit_"));
    assert!(result.site.technical.has_sitemap);
    assert_eq!(result.site.technical.sitemap_urls.len(), 2);
    assert_eq!(result.site.detected_name.as_deref(), Some("Harbor Dental"));
    assert_eq!(result.site.contact.email.as_deref(), Some("desk@harbor.example"));
    assert!(result.findings.is_empty());

    let urls: Vec<String> = result.pages.iter().map(|p| p.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/contact", base),
            format!("{}/faq", base),
        ]
    );
    assert_eq!(result.pages[2].status_code, 404);
}

#[tokio::test]
async fn test_run_audit_rejects_invalid_root() {
    let result = run_audit(&AuditConfig::default(), "http://").await;

    assert!(matches!(result, Err(AuditError::Crawl(_))));
}
