//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator discovers the top-level categories once, then crawls them
//! strictly one after another. All concurrency lives inside a single
//! category's crawl; the next category starts only when the previous one has
//! fully finished.

use crate::config::Config;
use crate::crawler::category::crawl_category;
use crate::crawler::extract::extract_category_links;
use crate::crawler::session::CrawlSession;
use crate::model::{Category, CategoryOutcome};
use crate::output::{CrawlStatistics, JsonFileStore, ReviewStore};
use crate::url::resolve_link;
use crate::HarvestError;
use std::sync::Arc;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    session: CrawlSession,
}

impl Coordinator {
    /// Creates a coordinator writing JSON files under `output.reviews-dir`
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let store = Arc::new(JsonFileStore::new(&config.output.reviews_dir));
        Self::with_store(config, store)
    }

    /// Creates a coordinator writing through the given review store
    pub fn with_store(config: Config, store: Arc<dyn ReviewStore>) -> Result<Self, HarvestError> {
        let session = CrawlSession::new(&config, store)?;
        Ok(Self {
            config: Arc::new(config),
            session,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches the catalog index and returns its categories
    ///
    /// Categories are deduplicated by path and returned in path order. Failing
    /// to load or understand the index is fatal: there is nothing to crawl.
    pub async fn discover_categories(&self) -> Result<Vec<Category>, HarvestError> {
        let catalog_url = resolve_link(self.session.base_url(), &self.config.site.catalog_path)?;
        tracing::info!("Discovering categories from {}", catalog_url);

        let doc = self.session.fetcher().fetch(&catalog_url, &[]).await?;
        let paths = extract_category_links(&doc, self.session.profile())?;

        tracing::info!("Discovered {} categories", paths.len());
        Ok(paths.into_iter().map(Category::from_path).collect())
    }

    /// Runs the crawl over every discovered category
    ///
    /// Skipped or failed categories are logged and counted; they never stop
    /// the iteration over the remaining ones.
    pub async fn run(&self) -> Result<CrawlStatistics, HarvestError> {
        let mut stats = CrawlStatistics::new();

        let categories = self.discover_categories().await?;
        let skip = self.config.crawler.skip_categories.min(categories.len());
        stats.categories_discovered = categories.len();
        stats.categories_ignored = skip;

        if skip > 0 {
            tracing::info!("Skipping the first {} categories", skip);
        }

        for category in categories.iter().skip(skip) {
            tracing::info!("Starting category {}", category.url_path);

            match crawl_category(&self.session, category).await {
                Ok(outcome) => {
                    if let CategoryOutcome::Crawled(report) = &outcome {
                        tracing::info!(
                            "Finished category {}: {} products written, {} reviews",
                            category.url_path,
                            report.tally.products_written,
                            report.tally.reviews_written
                        );
                    }
                    stats.record_category(&outcome);
                }
                Err(e) => {
                    tracing::error!("Category {} failed: {}", category.url_path, e);
                    stats.record_failure();
                }
            }
        }

        stats.finish();
        tracing::info!(
            "Crawl completed: {} categories, {} reviews in {}s",
            stats.categories_crawled,
            stats.tally.reviews_written,
            stats.duration_seconds().unwrap_or_default()
        );

        Ok(stats)
    }
}

/// Runs a complete crawl with the default JSON file store
///
/// # Example
///
/// ```no_run
/// use review_harvest::config::load_config;
/// use review_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let stats = run_crawl(config).await?;
/// println!("{} reviews written", stats.tally.reviews_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
