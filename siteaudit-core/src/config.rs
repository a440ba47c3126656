use siteaudit_scanner::crawler::{DEFAULT_MAX_PAGES, DEFAULT_SEED_LIMIT};
use siteaudit_scanner::fetch::DEFAULT_USER_AGENT;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Settings for one audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub max_pages: usize,
    pub include_subdomains: bool,
    /// Per-request fetch timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// How many same-site sitemap URLs join the root in the initial frontier.
    pub seed_limit: usize,
    pub show_progress: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            include_subdomains: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            seed_limit: DEFAULT_SEED_LIMIT,
            show_progress: false,
        }
    }
}

impl AuditConfig {
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_include_subdomains(mut self, include_subdomains: bool) -> Self {
        self.include_subdomains = include_subdomains;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}
