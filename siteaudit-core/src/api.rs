//! Transport-independent handler for the `POST /audit` request contract.
//!
//! The handler takes the raw method and body and returns an HTTP status plus a
//! JSON body, so any server (or the CLI `request` command) can host it.

use crate::audit::run_audit_with;
use crate::config::AuditConfig;
use crate::model::AuditResult;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use siteaudit_scanner::crawler::DEFAULT_MAX_PAGES;
use siteaudit_scanner::{Fetcher, HttpFetcher};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Use POST")]
    MethodNotAllowed,

    #[error("Missing `url`")]
    MissingUrl,

    #[error("{0}")]
    InvalidBody(String),
}

impl RequestError {
    pub fn status(&self) -> u16 {
        match self {
            RequestError::MethodNotAllowed => 405,
            RequestError::MissingUrl => 400,
            RequestError::InvalidBody(_) => 500,
        }
    }
}

/// Parameters accepted by the audit endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRequest {
    pub url: String,
    pub max_pages: usize,
    pub include_subdomains: bool,
}

impl AuditRequest {
    pub fn from_json(body: &Value) -> Result<Self, RequestError> {
        let url = match body.get("url") {
            Some(Value::String(url)) if !url.is_empty() => url.clone(),
            _ => return Err(RequestError::MissingUrl),
        };

        Ok(Self {
            url,
            max_pages: parse_max_pages(body.get("max_pages")),
            include_subdomains: body.get("include_subdomains").is_some_and(is_truthy),
        })
    }

    fn apply_to(&self, config: &AuditConfig) -> AuditConfig {
        config
            .clone()
            .with_max_pages(self.max_pages)
            .with_include_subdomains(self.include_subdomains)
    }
}

/// Numbers are accepted as a page budget; a fractional budget admits one
/// more page, a negative one admits none. Anything else means the default.
fn parse_max_pages(value: Option<&Value>) -> usize {
    match value.and_then(Value::as_f64) {
        Some(n) if n.is_finite() => n.ceil().max(0.0) as usize,
        _ => DEFAULT_MAX_PAGES,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Complete,
    Failed,
}

/// Response envelope for both successful and failed audits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResponse {
    pub audit_id: Option<String>,
    pub status: AuditStatus,
    pub error: Option<String>,
    pub result: Option<AuditResult>,
}

impl AuditResponse {
    pub fn complete(result: AuditResult) -> Self {
        Self {
            audit_id: Some(result.audit_id.clone()),
            status: AuditStatus::Complete,
            error: None,
            result: Some(result),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            audit_id: None,
            status: AuditStatus::Failed,
            error: Some(error.into()),
            result: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn error(err: &RequestError) -> Self {
        Self {
            status: err.status(),
            body: json!({ "error": err.to_string() }),
        }
    }

    fn envelope(status: u16, response: &AuditResponse) -> Self {
        let body = serde_json::to_value(response).unwrap_or_else(|e| {
            json!({
                "audit_id": null,
                "status": "failed",
                "error": e.to_string(),
                "result": null,
            })
        });
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Handle one request, fetching over HTTP.
pub async fn handle_audit_request(method: &str, body: &str, config: &AuditConfig) -> ApiResponse {
    match HttpFetcher::with_options(&config.user_agent, config.timeout_secs) {
        Ok(fetcher) => handle_audit_request_with(fetcher, method, body, config).await,
        Err(e) => ApiResponse::envelope(500, &AuditResponse::failed(e.to_string())),
    }
}

/// Handle one request with the given fetcher.
pub async fn handle_audit_request_with<F: Fetcher>(
    fetcher: F,
    method: &str,
    body: &str,
    config: &AuditConfig,
) -> ApiResponse {
    if !method.eq_ignore_ascii_case("POST") {
        return ApiResponse::error(&RequestError::MethodNotAllowed);
    }

    let body = if body.trim().is_empty() { "{}" } else { body };
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Rejecting audit request with unparseable body: {}", e);
            let err = RequestError::InvalidBody(e.to_string());
            return ApiResponse::envelope(err.status(), &AuditResponse::failed(err.to_string()));
        }
    };

    let request = match AuditRequest::from_json(&value) {
        Ok(request) => request,
        Err(err) => return ApiResponse::error(&err),
    };

    info!(
        "Audit request for {} (max_pages={}, include_subdomains={})",
        request.url, request.max_pages, request.include_subdomains
    );

    let config = request.apply_to(config);
    match run_audit_with(fetcher, &config, &request.url).await {
        Ok(result) => ApiResponse::envelope(200, &AuditResponse::complete(result)),
        Err(e) => ApiResponse::envelope(500, &AuditResponse::failed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_max_pages() {
        assert_eq!(parse_max_pages(None), 25);
        assert_eq!(parse_max_pages(Some(&json!(3))), 3);
        assert_eq!(parse_max_pages(Some(&json!(2.5))), 3);
        assert_eq!(parse_max_pages(Some(&json!(-4))), 0);
        assert_eq!(parse_max_pages(Some(&json!("10"))), 25);
        assert_eq!(parse_max_pages(Some(&Value::Null)), 25);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("no")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_request_requires_string_url() {
        assert_eq!(AuditRequest::from_json(&json!({})), Err(RequestError::MissingUrl));
        assert_eq!(
            AuditRequest::from_json(&json!({"url": ""})),
            Err(RequestError::MissingUrl)
        );
        assert_eq!(
            AuditRequest::from_json(&json!({"url": 42})),
            Err(RequestError::MissingUrl)
        );
        assert_eq!(AuditRequest::from_json(&Value::Null), Err(RequestError::MissingUrl));
    }

    #[test]
    fn test_request_defaults() {
        let request = AuditRequest::from_json(&json!({"url": "example.com"})).unwrap();

        assert_eq!(request.url, "example.com");
        assert_eq!(request.max_pages, 25);
        assert!(!request.include_subdomains);
    }
}
