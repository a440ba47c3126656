use crate::aggregate::Aggregator;
use crate::config::AuditConfig;
use crate::error::Result;
use crate::model::AuditResult;
use indicatif::{ProgressBar, ProgressStyle};
use siteaudit_scanner::{Crawler, Fetcher, HttpFetcher, ProgressCallback};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// `audit_<unix millis in base 36>_<6 random chars>`
pub fn make_audit_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("audit_{}_{}", to_base36(millis), &random[..6])
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Audit one site over HTTP.
pub async fn run_audit(config: &AuditConfig, url: &str) -> Result<AuditResult> {
    let fetcher = HttpFetcher::with_options(&config.user_agent, config.timeout_secs)?;
    run_audit_with(fetcher, config, url).await
}

/// Audit one site with the given fetcher: crawl, then aggregate.
pub async fn run_audit_with<F: Fetcher>(
    fetcher: F,
    config: &AuditConfig,
    url: &str,
) -> Result<AuditResult> {
    let audit_id = make_audit_id();
    info!("Audit {} started for {}", audit_id, url);

    let progress_bar = if config.show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Starting audit of {}...", url));
        Some(Arc::new(pb))
    } else {
        None
    };

    let mut crawler = Crawler::new(fetcher)
        .with_max_pages(config.max_pages)
        .with_include_subdomains(config.include_subdomains)
        .with_seed_limit(config.seed_limit);

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let max_pages = config.max_pages;
        let callback: ProgressCallback = Arc::new(move |count: usize, page_url: String| {
            pb_clone.set_message(format!(
                "[{}/{}] {}",
                count + 1,
                max_pages,
                extract_url_path(&page_url)
            ));
        });
        crawler = crawler.with_progress_callback(callback);
    }

    let output = match crawler.crawl(url).await {
        Ok(output) => output,
        Err(e) => {
            warn!("Audit {} failed: {}", audit_id, e);
            if let Some(ref pb) = progress_bar {
                pb.finish_with_message(format!("Audit of {} failed", url));
            }
            return Err(e.into());
        }
    };

    let result = Aggregator::default().aggregate(audit_id, output);

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Audit complete! {} pages, {} findings",
            result.pages.len(),
            result.findings.len()
        ));
    }

    info!(
        "Audit {} complete: {} pages, {} edges, {} findings",
        result.audit_id,
        result.pages.len(),
        result.link_graph.len(),
        result.findings.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_id_shape() {
        let id = make_audit_id();
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "audit");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_audit_ids_differ() {
        assert_ne!(make_audit_id(), make_audit_id());
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_extract_url_path() {
        assert_eq!(extract_url_path("https://example.com/"), "/");
        assert_eq!(extract_url_path("https://example.com/api?x=1"), "/api");
        assert_eq!(extract_url_path("not a url"), "not a url");
    }
}
