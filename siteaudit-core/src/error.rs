use siteaudit_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    /// The crawl could not establish its root URL or HTTP client.
    #[error("Crawl failed: {0}")]
    Crawl(#[from] ScanError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
