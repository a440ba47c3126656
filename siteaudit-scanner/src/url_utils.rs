//! URL canonicalization and site-boundary checks.
//!
//! Every URL that enters the frontier, the seen-set or a page record goes
//! through [`normalize_url`] first.

use crate::error::{Result, ScanError};
use url::Url;

/// Analytics query keys dropped from discovered links.
pub const TRACKING_PARAMS: [&str; 7] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
];

/// Canonicalize a possibly scheme-less URL string.
///
/// Prepends `https://` when no `http(s)://` prefix is present, drops the
/// fragment and collapses trailing slashes to exactly one.
pub fn normalize_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&candidate)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", input, e)))?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ScanError::InvalidUrl(format!("{}: missing host", input)));
    }

    url.set_fragment(None);

    let serialized = url.to_string();
    let without_slashes = serialized.trim_end_matches('/');
    if without_slashes.len() == serialized.len() {
        Ok(serialized)
    } else {
        Ok(format!("{}/", without_slashes))
    }
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Decide whether `candidate` belongs to the same site as `root`.
///
/// Without subdomains this is plain origin equality (scheme, host, port).
/// With subdomains the last two hostname labels are compared, which
/// over-matches on multi-label public suffixes such as `.co.uk`.
pub fn same_site(candidate: &str, root: &str, include_subdomains: bool) -> bool {
    let (Ok(a), Ok(b)) = (Url::parse(candidate), Url::parse(root)) else {
        return false;
    };

    if include_subdomains {
        match (a.host_str(), b.host_str()) {
            (Some(host_a), Some(host_b)) => {
                registrable_domain(host_a) == registrable_domain(host_b)
            }
            _ => false,
        }
    } else {
        a.origin() == b.origin()
    }
}

/// Last two dot-separated labels of a hostname.
pub fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}

/// Origin of a URL serialized as `scheme://host[:port]`.
pub fn origin_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
    Ok(parsed.origin().ascii_serialization())
}

pub fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key)
}

/// Remove tracking query keys and the fragment in place.
///
/// Other parameters keep their relative order. A URL whose query consisted
/// only of tracking keys keeps an empty `?`.
pub fn strip_tracking_params(url: &mut Url) {
    url.set_fragment(None);

    if url.query().is_none() {
        return;
    }

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if !pairs.iter().any(|(key, _)| is_tracking_param(key)) {
        return;
    }

    let kept: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(key, _)| !is_tracking_param(key))
        .collect();

    url.query_pairs_mut().clear().extend_pairs(kept);
}

pub fn strip_tracking(url: &str) -> Result<String> {
    let mut parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
    strip_tracking_params(&mut parsed);
    Ok(parsed.to_string())
}
