//! Outcomes of product and category crawls

use crate::output::OutputError;
use crate::{ExtractError, FetchError, UrlError};
use std::path::PathBuf;
use thiserror::Error;

/// Why a unit of work was skipped without aborting its siblings
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Url(#[from] UrlError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Result of crawling one product
#[derive(Debug)]
pub enum ProductOutcome {
    /// Reviews were collected and written to `path`
    Written {
        path: PathBuf,
        reviews: usize,
        failed_pages: u32,
    },

    /// Every page loaded (or failed) without yielding a review; nothing written
    NoReviews { failed_pages: u32 },

    /// The product page could not be fetched or understood
    Skipped(SkipReason),
}

/// Summary of one fully crawled category
#[derive(Debug, Clone)]
pub struct CategoryReport {
    /// Display name taken from the category page
    pub name: String,

    /// Directory holding the category's review files
    pub directory: PathBuf,

    pub tally: CrawlTally,
}

/// Result of crawling one category
#[derive(Debug)]
pub enum CategoryOutcome {
    Crawled(CategoryReport),
    Skipped(SkipReason),
}

/// Counters accumulated by crawl tasks and merged at each fan-in point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlTally {
    pub listing_pages: u32,
    pub listing_pages_failed: u32,
    pub products_written: u32,
    pub products_without_reviews: u32,
    pub products_skipped: u32,
    pub products_failed: u32,
    pub review_pages_failed: u32,
    pub reviews_written: usize,
}

impl CrawlTally {
    /// Records the outcome of one product crawl
    pub fn record_product(&mut self, outcome: &ProductOutcome) {
        match outcome {
            ProductOutcome::Written {
                reviews,
                failed_pages,
                ..
            } => {
                self.products_written += 1;
                self.reviews_written += reviews;
                self.review_pages_failed += failed_pages;
            }
            ProductOutcome::NoReviews { failed_pages } => {
                self.products_without_reviews += 1;
                self.review_pages_failed += failed_pages;
            }
            ProductOutcome::Skipped(_) => self.products_skipped += 1,
        }
    }

    /// Adds another tally's counters to this one
    pub fn merge(&mut self, other: &CrawlTally) {
        self.listing_pages += other.listing_pages;
        self.listing_pages_failed += other.listing_pages_failed;
        self.products_written += other.products_written;
        self.products_without_reviews += other.products_without_reviews;
        self.products_skipped += other.products_skipped;
        self.products_failed += other.products_failed;
        self.review_pages_failed += other.review_pages_failed;
        self.reviews_written += other.reviews_written;
    }

    /// Total number of products attempted
    pub fn products_seen(&self) -> u32 {
        self.products_written
            + self.products_without_reviews
            + self.products_skipped
            + self.products_failed
    }
}
