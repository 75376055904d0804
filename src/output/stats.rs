//! Crawl statistics
//!
//! Counters for one crawl run, filled in by the coordinator as categories
//! finish and printed at the end of the run.

use crate::model::{CategoryOutcome, CrawlTally};
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Categories found on the catalog index
    pub categories_discovered: usize,

    /// Categories skipped by configuration
    pub categories_ignored: usize,

    pub categories_crawled: usize,
    pub categories_skipped: usize,

    /// Categories aborted by an unexpected error
    pub categories_failed: usize,

    /// Directories written, one per crawled category
    pub category_dirs: Vec<String>,

    /// Counters merged from every crawled category
    pub tally: CrawlTally,
}

impl CrawlStatistics {
    /// Starts a new statistics record stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            categories_discovered: 0,
            categories_ignored: 0,
            categories_crawled: 0,
            categories_skipped: 0,
            categories_failed: 0,
            category_dirs: Vec::new(),
            tally: CrawlTally::default(),
        }
    }

    /// Records the outcome of one category crawl
    pub fn record_category(&mut self, outcome: &CategoryOutcome) {
        match outcome {
            CategoryOutcome::Crawled(report) => {
                self.categories_crawled += 1;
                self.category_dirs
                    .push(report.directory.display().to_string());
                self.tally.merge(&report.tally);
            }
            CategoryOutcome::Skipped(_) => self.categories_skipped += 1,
        }
    }

    /// Records a category that failed with an unexpected error
    pub fn record_failure(&mut self) {
        self.categories_failed += 1;
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        println!(
            "  Duration: {} seconds ({:.2} minutes)",
            duration,
            duration as f64 / 60.0
        );
    }
    println!();

    println!("Categories:");
    println!("  Discovered: {}", stats.categories_discovered);
    println!("  Ignored by configuration: {}", stats.categories_ignored);
    println!("  Crawled: {}", stats.categories_crawled);
    println!("  Skipped: {}", stats.categories_skipped);
    println!("  Failed: {}", stats.categories_failed);
    println!();

    let tally = &stats.tally;
    println!("Listing pages:");
    println!("  Total: {}", tally.listing_pages);
    println!("  Failed: {}", tally.listing_pages_failed);
    println!();

    println!("Products:");
    println!("  Seen: {}", tally.products_seen());
    println!("  Written: {}", tally.products_written);
    println!("  Without reviews: {}", tally.products_without_reviews);
    println!("  Skipped: {}", tally.products_skipped);
    println!("  Failed: {}", tally.products_failed);
    println!("  Failed review pages: {}", tally.review_pages_failed);
    println!();

    println!("Reviews written: {}", tally.reviews_written);

    if !stats.category_dirs.is_empty() {
        println!("\nOutput directories ({}):", stats.category_dirs.len());
        for dir in &stats.category_dirs {
            println!("  - {}", dir);
        }
    }
}
