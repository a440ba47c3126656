pub mod crawler;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod frontier;
pub mod result;
pub mod sitemap;
pub mod url_utils;

pub use crawler::{CrawlOutput, Crawler, ProgressCallback};
pub use error::ScanError;
pub use fetch::{FetchedResponse, Fetcher, HttpFetcher};
pub use result::{Indexability, LinkEdge, PageRecord, PageType};
pub use sitemap::{SitemapOutcome, SitemapUnavailable};
