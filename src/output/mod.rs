//! Output module for review files and crawl reports
//!
//! This module handles:
//! - The `ReviewStore` capability used by the crawler
//! - Writing per-product JSON review files
//! - Recording and printing crawl statistics

mod json;
pub mod stats;
mod traits;

pub use json::JsonFileStore;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ReviewStore};
