use crate::error::Result;
use crate::extract::extract_page;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::frontier::Frontier;
use crate::result::{LinkEdge, PageRecord};
use crate::sitemap::{SitemapOutcome, discover_sitemap};
use crate::url_utils::{normalize_url, same_site};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_PAGES: usize = 25;
pub const DEFAULT_SEED_LIMIT: usize = 15;

/// Called before each fetch with the number of pages recorded so far and the URL.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

pub struct Crawler<F: Fetcher = HttpFetcher> {
    fetcher: F,
    max_pages: usize,
    include_subdomains: bool,
    seed_limit: usize,
    progress_callback: Option<ProgressCallback>,
}

/// Raw result of one crawl, before site-level aggregation.
#[derive(Debug, Clone)]
pub struct CrawlOutput {
    pub root_url: String,
    pub pages: Vec<PageRecord>,
    pub link_graph: Vec<LinkEdge>,
    pub sitemap: SitemapOutcome,
    /// Sitemap entries that pass the site boundary check, before the seed limit.
    pub sitemap_same_site: usize,
}

/// Edge list that drops exact duplicates while keeping discovery order.
#[derive(Default)]
struct LinkGraph {
    edges: Vec<LinkEdge>,
    seen: HashSet<LinkEdge>,
}

impl LinkGraph {
    fn add(&mut self, from: &str, to: &str) {
        let edge = LinkEdge {
            from: from.to_string(),
            to: to.to_string(),
        };
        if self.seen.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }

    fn into_edges(self) -> Vec<LinkEdge> {
        self.edges
    }
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            max_pages: DEFAULT_MAX_PAGES,
            include_subdomains: false,
            seed_limit: DEFAULT_SEED_LIMIT,
            progress_callback: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_include_subdomains(mut self, include_subdomains: bool) -> Self {
        self.include_subdomains = include_subdomains;
        self
    }

    pub fn with_seed_limit(mut self, seed_limit: usize) -> Self {
        self.seed_limit = seed_limit;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn include_subdomains(&self) -> bool {
        self.include_subdomains
    }

    /// Breadth-first crawl from `start_url`, bounded by the page budget.
    ///
    /// Only a start URL that cannot be normalized is an error; every
    /// per-page problem ends up in the returned records.
    pub async fn crawl(&self, start_url: &str) -> Result<CrawlOutput> {
        let root = normalize_url(start_url)?;
        info!(
            "Starting crawl of {} (max pages: {}, subdomains: {})",
            root, self.max_pages, self.include_subdomains
        );

        let sitemap = discover_sitemap(&self.fetcher, &root).await;
        if let SitemapOutcome::Unavailable(reason) = &sitemap {
            info!("No usable sitemap for {}: {}", root, reason);
        }

        let (sitemap_same_site, seeds) = self.sitemap_seeds(&sitemap, &root);
        if sitemap.is_available() && sitemap_same_site == 0 {
            info!("Sitemap for {} lists no same-site URLs", root);
        }

        let mut frontier = Frontier::new();
        frontier.enqueue(root.clone());
        for seed in seeds {
            frontier.enqueue(seed);
        }

        let mut pages: Vec<PageRecord> = Vec::new();
        let mut graph = LinkGraph::default();

        while pages.len() < self.max_pages {
            let Some(next) = frontier.dequeue() else {
                break;
            };

            let url = match normalize_url(&next) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Skipping frontier entry {:?}: {}", next, e);
                    continue;
                }
            };

            if !frontier.mark_seen(&url) {
                continue;
            }

            if !same_site(&url, &root, self.include_subdomains) {
                debug!("Skipping off-site URL {}", url);
                continue;
            }

            if let Some(ref callback) = self.progress_callback {
                callback(pages.len(), url.clone());
            }

            let page = self.visit(&url, &root, &mut frontier, &mut graph).await;
            pages.push(page);
        }

        info!(
            "Crawl of {} complete. Visited {} pages, {} still pending, {} edges",
            root,
            pages.len(),
            frontier.pending(),
            graph.edges.len()
        );

        Ok(CrawlOutput {
            root_url: root,
            pages,
            link_graph: graph.into_edges(),
            sitemap,
            sitemap_same_site,
        })
    }

    /// Count of same-site sitemap entries, and the normalized seeds taken from them.
    fn sitemap_seeds(&self, sitemap: &SitemapOutcome, root: &str) -> (usize, Vec<String>) {
        let same_site_urls: Vec<&String> = sitemap
            .urls()
            .iter()
            .filter(|url| same_site(url, root, self.include_subdomains))
            .collect();

        let seeds = same_site_urls
            .iter()
            .filter_map(|url| normalize_url(url).ok())
            .take(self.seed_limit)
            .collect();

        (same_site_urls.len(), seeds)
    }

    /// Fetch and extract one URL, feeding discovered same-site links back
    /// into the frontier.
    async fn visit(
        &self,
        url: &str,
        root: &str,
        frontier: &mut Frontier,
        graph: &mut LinkGraph,
    ) -> PageRecord {
        let response = match self.fetcher.fetch(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                return PageRecord::unreachable(url.to_string());
            }
        };

        if !response.is_html() {
            debug!(
                "Not parsing {} (status {}, content-type {:?})",
                url, response.status, response.content_type
            );
            return PageRecord::new(url.to_string(), response.status);
        }

        let mut extracted = extract_page(&response.text, url);
        let links = std::mem::take(&mut extracted.links);

        let mut internal_links = Vec::new();
        for link in links {
            if !same_site(&link, root, self.include_subdomains) {
                continue;
            }

            graph.add(url, &link);

            if let Ok(normalized) = normalize_url(&link)
                && !frontier.has_seen(&normalized)
            {
                frontier.enqueue(normalized);
            }

            internal_links.push(link);
        }

        debug!("{} -> {} internal links", url, internal_links.len());
        extracted.into_page_record(url.to_string(), response.status, internal_links)
    }
}
