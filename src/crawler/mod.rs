//! Crawler module for review harvesting
//!
//! This module contains the crawl pipeline, leaf-first:
//! - Rate-limited HTTP fetching
//! - HTML extraction profiles
//! - Bounded fan-out of page tasks
//! - Review page, product and category crawlers
//! - Overall crawl coordination

mod category;
mod comments;
mod coordinator;
pub mod extract;
mod fetcher;
mod product;
mod scheduler;
mod session;

pub use category::crawl_category;
pub use comments::{fetch_review_page, REVIEWS_QUERY};
pub use coordinator::{run_crawl, Coordinator};
pub use extract::ExtractionProfile;
pub use fetcher::{build_http_client, Document, Fetcher};
pub use product::crawl_product;
pub use scheduler::{FanOut, FanOutResults};
pub use session::CrawlSession;
