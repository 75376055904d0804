//! Data model for the crawl
//!
//! # Components
//!
//! - `Category`, `CategoryPage`, `Product`, `Review`: records discovered while crawling
//! - `ProductOutcome`, `CategoryOutcome`: what happened to each unit of work
//! - `CrawlTally`: counters merged bottom-up at each fan-in point

mod catalog;
mod outcome;

pub use catalog::{sanitize_name, Category, CategoryPage, Product, Review};
pub use outcome::{CategoryOutcome, CategoryReport, CrawlTally, ProductOutcome, SkipReason};
