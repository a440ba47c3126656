use crate::error::{Result, ScanError};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = concat!(
    "SiteAudit/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/siteaudit/siteaudit)"
);

#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    /// Raw `content-type` header value, empty when absent.
    pub content_type: String,
    pub text: String,
    pub headers: HeaderMap,
}

impl FetchedResponse {
    pub fn new(status: u16, content_type: &str, text: &str) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            text: text.to_string(),
            headers: HeaderMap::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("text/html")
    }
}

/// Network fetch primitive used by the crawler and sitemap discovery.
///
/// Implementations follow redirects and report transport failures
/// (DNS, connect, timeout) as errors.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedResponse>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_USER_AGENT, 15)
    }

    pub fn with_options(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ScanError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let text = response.text().await?;

        Ok(FetchedResponse {
            status,
            content_type,
            text,
            headers,
        })
    }
}
