//! Shared crawl session
//!
//! A `CrawlSession` bundles everything a crawl task needs. It is cheap to
//! clone so spawned tasks can each own a handle; nothing inside it is mutated
//! during the crawl.

use crate::config::Config;
use crate::crawler::extract::ExtractionProfile;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::scheduler::FanOut;
use crate::output::ReviewStore;
use crate::url::parse_base_url;
use crate::HarvestError;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Clone)]
pub struct CrawlSession {
    base_url: Arc<Url>,
    fetcher: Fetcher,
    profile: Arc<ExtractionProfile>,
    store: Arc<dyn ReviewStore>,
    listing_pool: FanOut,
    review_pool: FanOut,
    product_delay: Duration,
    max_pages: u32,
}

impl CrawlSession {
    /// Builds a session from configuration and a review store
    pub fn new(config: &Config, store: Arc<dyn ReviewStore>) -> Result<Self, HarvestError> {
        Ok(Self {
            base_url: Arc::new(parse_base_url(&config.site.base_url)?),
            fetcher: Fetcher::from_config(&config.http)?,
            profile: Arc::new(ExtractionProfile::from_config(&config.selectors)?),
            store,
            listing_pool: FanOut::new(
                "listing pages",
                config.crawler.max_concurrent_listing_pages as usize,
            ),
            review_pool: FanOut::new(
                "review pages",
                config.crawler.max_concurrent_review_pages as usize,
            ),
            product_delay: Duration::from_millis(config.crawler.product_delay_ms),
            max_pages: config.crawler.max_pages,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn profile(&self) -> &ExtractionProfile {
        &self.profile
    }

    pub fn store(&self) -> &dyn ReviewStore {
        self.store.as_ref()
    }

    /// Pool bounding concurrently processed category listing pages
    pub fn listing_pool(&self) -> &FanOut {
        &self.listing_pool
    }

    /// Pool bounding concurrently fetched review pages
    pub fn review_pool(&self) -> &FanOut {
        &self.review_pool
    }

    /// Delay before each product crawled by a listing-page task
    pub fn product_delay(&self) -> Duration {
        self.product_delay
    }

    /// Caps a page count read from a pagination block at `crawler.max-pages`
    pub fn cap_page_count(&self, page_count: u32, what: &str) -> u32 {
        if page_count > self.max_pages {
            tracing::warn!(
                "{} claims {} pages, crawling only the first {}",
                what,
                page_count,
                self.max_pages
            );
            self.max_pages
        } else {
            page_count
        }
    }
}
