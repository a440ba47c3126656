// Tests for the audit request handler

use serde_json::{Value, json};
use siteaudit_core::api::{AuditResponse, AuditStatus, handle_audit_request_with};
use siteaudit_core::config::AuditConfig;
use siteaudit_scanner::error::Result;
use siteaudit_scanner::{FetchedResponse, Fetcher, ScanError};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct StubFetcher {
    pages: HashMap<String, FetchedResponse>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn html(mut self, url: &str, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), FetchedResponse::new(200, "text/html", body));
        self
    }

    fn xml(mut self, url: &str, body: &str) -> Self {
        self.pages
            .insert(url.to_string(), FetchedResponse::new(200, "application/xml", body));
        self
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Fetcher for &StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScanError::Other(format!("connection refused: {}", url)))
    }
}

fn config() -> AuditConfig {
    AuditConfig::default()
}

// ============================================================================
// Request Validation Tests
// ============================================================================

#[tokio::test]
async fn test_non_post_rejected() {
    let fetcher = StubFetcher::default();

    for method in ["GET", "PUT", "DELETE"] {
        let response =
            handle_audit_request_with(&fetcher, method, r#"{"url":"example.com"}"#, &config()).await;

        assert_eq!(response.status, 405);
        assert_eq!(response.body, json!({"error": "Use POST"}));
    }
    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn test_missing_url_rejected() {
    let fetcher = StubFetcher::default();

    for body in ["", "{}", r#"{"url":""}"#, r#"{"url":null}"#, r#"{"max_pages":3}"#] {
        let response = handle_audit_request_with(&fetcher, "POST", body, &config()).await;

        assert_eq!(response.status, 400, "body: {}", body);
        assert_eq!(response.body, json!({"error": "Missing `url`"}));
    }
    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn test_unparseable_body_fails() {
    let fetcher = StubFetcher::default();

    let response = handle_audit_request_with(&fetcher, "POST", "{not json", &config()).await;

    assert_eq!(response.status, 500);
    assert_eq!(response.body["status"], "failed");
    assert_eq!(response.body["audit_id"], Value::Null);
    assert_eq!(response.body["result"], Value::Null);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_invalid_root_fails_without_partial_result() {
    let fetcher = StubFetcher::default();

    let response =
        handle_audit_request_with(&fetcher, "POST", r#"{"url":"http://"}"#, &config()).await;

    assert_eq!(response.status, 500);
    let envelope: AuditResponse = serde_json::from_value(response.body).unwrap();
    assert_eq!(envelope.status, AuditStatus::Failed);
    assert!(envelope.audit_id.is_none());
    assert!(envelope.result.is_none());
    assert!(envelope.error.is_some());
    assert_eq!(fetcher.request_count(), 0);
}

// ============================================================================
// End-to-end Scenarios
// ============================================================================

#[tokio::test]
async fn test_unreachable_site_single_page() {
    let fetcher = StubFetcher::default();

    let response = handle_audit_request_with(
        &fetcher,
        "POST",
        r#"{"url":"example.com","max_pages":1}"#,
        &config(),
    )
    .await;

    assert_eq!(response.status, 200);
    assert!(response.is_success());

    let envelope: AuditResponse = serde_json::from_value(response.body).unwrap();
    assert_eq!(envelope.status, AuditStatus::Complete);
    assert!(envelope.error.is_none());

    let result = envelope.result.unwrap();
    assert_eq!(envelope.audit_id.as_deref(), Some(result.audit_id.as_str()));
    assert!(result.audit_id.starts_with("audit_"));
    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.pages[0].url, "https://example.com/");
    assert_eq!(result.pages[0].status_code, 0);
    assert!(!result.site.technical.has_sitemap);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].code, "missing_sitemap");
}

#[tokio::test]
async fn test_sitemap_listing_only_www_urls_counts_as_missing() {
    let fetcher = StubFetcher::default()
        .xml(
            "https://example.com/sitemap.xml",
            "<urlset><url><loc>https://www.example.com/a</loc></url></urlset>",
        )
        .html("https://example.com/", "<h1>Home</h1>");

    let response =
        handle_audit_request_with(&fetcher, "POST", r#"{"url":"example.com"}"#, &config()).await;

    assert_eq!(response.status, 200);
    let technical = &response.body["result"]["site"]["technical"];
    assert_eq!(technical["has_sitemap"], false);
    assert_eq!(technical["sitemap_urls"], json!(["https://www.example.com/a"]));

    let findings = response.body["result"]["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["code"], "missing_sitemap");
    assert_eq!(response.body["result"]["pages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_complete_audit_envelope() {
    let fetcher = StubFetcher::default()
        .xml(
            "https://example.com/sitemap.xml",
            "<urlset><url><loc>https://example.com/services</loc></url></urlset>",
        )
        .html(
            "https://example.com/",
            r#"<html><head><title>Acme</title></head><body>
               <h1>Acme Plumbing</h1>
               <p>Email office@acme.example or call +1 555 010 9999</p>
               <a href="/about?utm_source=x#top">About</a>
               </body></html>"#,
        )
        .html(
            "https://example.com/services",
            "<h1>Services</h1><h2>Drains</h2><h2>Boilers</h2>",
        )
        .html("https://example.com/about?", "<h1>About us</h1>");

    let response = handle_audit_request_with(
        &fetcher,
        "POST",
        r#"{"url":"https://example.com","max_pages":10}"#,
        &config(),
    )
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["status"], "complete");
    assert_eq!(response.body["error"], Value::Null);

    let result = &response.body["result"];
    assert_eq!(result["site"]["detected_name"], "Acme Plumbing");
    assert_eq!(result["site"]["contact"]["email"], "office@acme.example");
    assert_eq!(result["site"]["contact"]["phone"], "+1 555 010 9999");
    assert_eq!(result["site"]["technical"]["has_sitemap"], true);
    assert_eq!(
        result["site"]["detected_services"],
        json!(["Services", "Drains", "Boilers"])
    );
    assert_eq!(result["findings"], json!([]));

    let urls: Vec<&str> = result["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["url"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/",
            "https://example.com/services",
            "https://example.com/about?"
        ]
    );
    assert_eq!(result["pages"][1]["detected_page_type"], "service");
}

#[tokio::test]
async fn test_max_pages_rounds_up() {
    let fetcher = StubFetcher::default()
        .html("https://example.com/", r#"<a href="/a">a</a><a href="/b">b</a><a href="/c">c</a>"#)
        .html("https://example.com/a", "<p>a</p>")
        .html("https://example.com/b", "<p>b</p>")
        .html("https://example.com/c", "<p>c</p>");

    let response = handle_audit_request_with(
        &fetcher,
        "POST",
        r#"{"url":"example.com","max_pages":1.5}"#,
        &config(),
    )
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["result"]["pages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_zero_budget_crawls_nothing() {
    let fetcher = StubFetcher::default().html("https://example.com/", "<h1>Home</h1>");

    let response = handle_audit_request_with(
        &fetcher,
        "POST",
        r#"{"url":"example.com","max_pages":-3}"#,
        &config(),
    )
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["result"]["pages"], json!([]));
    // Only the sitemap request goes out.
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn test_include_subdomains_truthy_string() {
    let fetcher = StubFetcher::default()
        .html(
            "https://example.com/",
            r#"<a href="https://blog.example.com/post">post</a>"#,
        )
        .html("https://blog.example.com/post", "<h1>Post</h1>");

    let response = handle_audit_request_with(
        &fetcher,
        "POST",
        r#"{"url":"example.com","include_subdomains":"yes"}"#,
        &config(),
    )
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body["result"]["pages"].as_array().unwrap().len(), 2);
    assert_eq!(
        response.body["result"]["link_graph"],
        json!([{"from": "https://example.com/", "to": "https://blog.example.com/post"}])
    );
}
