//! Document extraction profiles
//!
//! Pure functions turning fetched HTML into typed records:
//! - category links from the catalog index
//! - product links and page counts from category listings
//! - page counts, names and reviews from product review pages
//!
//! Extraction failures on optional structure degrade instead of failing: a
//! missing pagination block means a single page and a review container
//! lacking a field is dropped on its own.

use crate::config::SelectorConfig;
use crate::crawler::fetcher::Document;
use crate::model::Review;
use crate::{ConfigError, ExtractError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;

static CATEGORY_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/c/([\w.-]+)/").expect("category path pattern is valid"));

/// Compiled selectors for every extraction profile
#[derive(Debug, Clone)]
pub struct ExtractionProfile {
    pub category_link: Selector,
    pub category_pagination: Selector,
    pub category_pagination_item: Selector,
    pub category_title: Selector,
    pub product_link: Selector,
    pub product_pagination: Selector,
    pub product_pagination_item: Selector,
    pub product_title: Selector,
    pub review_container: Selector,
    pub review_author: Selector,
    pub review_date: Selector,
    pub review_content: Selector,
}

impl ExtractionProfile {
    /// Compiles the configured selectors
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let compile = |field: &'static str, selector: &str| {
            Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
                field,
                selector: selector.to_string(),
            })
        };

        Ok(Self {
            category_link: compile("category-link", &config.category_link)?,
            category_pagination: compile("category-pagination", &config.category_pagination)?,
            category_pagination_item: compile(
                "category-pagination-item",
                &config.category_pagination_item,
            )?,
            category_title: compile("category-title", &config.category_title)?,
            product_link: compile("product-link", &config.product_link)?,
            product_pagination: compile("product-pagination", &config.product_pagination)?,
            product_pagination_item: compile(
                "product-pagination-item",
                &config.product_pagination_item,
            )?,
            product_title: compile("product-title", &config.product_title)?,
            review_container: compile("review-container", &config.review_container)?,
            review_author: compile("review-author", &config.review_author)?,
            review_date: compile("review-date", &config.review_date)?,
            review_content: compile("review-content", &config.review_content)?,
        })
    }
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self::from_config(&SelectorConfig::default()).expect("default selectors are valid")
    }
}

/// Extracts the set of `/c/<slug>/` category paths from the catalog index
///
/// Anchors whose `href` has no category segment are skipped. A page without
/// any category-link anchor at all is an error: there is nothing to crawl.
pub fn extract_category_links(
    doc: &Document,
    profile: &ExtractionProfile,
) -> Result<BTreeSet<String>, ExtractError> {
    let html = Html::parse_document(&doc.body);
    let mut anchors = html.select(&profile.category_link).peekable();

    if anchors.peek().is_none() {
        return Err(missing("category-link", doc));
    }

    Ok(anchors
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| CATEGORY_PATH.find(href))
        .map(|m| m.as_str().to_string())
        .collect())
}

/// Extracts product link targets from a category listing page, in page order
pub fn extract_product_links(doc: &Document, profile: &ExtractionProfile) -> Vec<String> {
    let html = Html::parse_document(&doc.body);

    html.select(&profile.product_link)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

/// Reads the listing page count from the second-to-last item of the first
/// pagination block
pub fn try_category_page_count(
    doc: &Document,
    profile: &ExtractionProfile,
) -> Result<u32, ExtractError> {
    let html = Html::parse_document(&doc.body);
    let container = html
        .select(&profile.category_pagination)
        .next()
        .ok_or_else(|| missing("category-pagination", doc))?;
    let items: Vec<ElementRef> = container
        .select(&profile.category_pagination_item)
        .collect();

    let item = items
        .len()
        .checked_sub(2)
        .map(|index| items[index])
        .ok_or_else(|| missing("category-pagination", doc))?;

    parse_page_number("category-pagination", doc, &element_text(item))
}

/// Reads the review page count from the last anchor of the first pagination
/// block
pub fn try_product_page_count(
    doc: &Document,
    profile: &ExtractionProfile,
) -> Result<u32, ExtractError> {
    let html = Html::parse_document(&doc.body);

    let container = html
        .select(&profile.product_pagination)
        .next()
        .ok_or_else(|| missing("product-pagination", doc))?;
    let anchor = container
        .select(&profile.product_pagination_item)
        .last()
        .ok_or_else(|| missing("product-pagination", doc))?;

    parse_page_number("product-pagination", doc, &element_text(anchor))
}

/// Category page count, falling back to a single page
pub fn extract_category_page_count(doc: &Document, profile: &ExtractionProfile) -> u32 {
    page_count_or_single(try_category_page_count(doc, profile))
}

/// Product review page count, falling back to a single page
pub fn extract_product_page_count(doc: &Document, profile: &ExtractionProfile) -> u32 {
    page_count_or_single(try_product_page_count(doc, profile))
}

/// Applies the pagination fallback: any extraction failure means one page
pub fn page_count_or_single(result: Result<u32, ExtractError>) -> u32 {
    match result {
        Ok(count) => count,
        Err(e) => {
            tracing::debug!("{}; assuming a single page", e);
            1
        }
    }
}

/// Extracts the category display name from its listing page heading
pub fn extract_category_name(
    doc: &Document,
    profile: &ExtractionProfile,
) -> Result<String, ExtractError> {
    extract_heading(doc, &profile.category_title, "category-title")
}

/// Extracts the product display name from its review page heading
pub fn extract_product_name(
    doc: &Document,
    profile: &ExtractionProfile,
) -> Result<String, ExtractError> {
    extract_heading(doc, &profile.product_title, "product-title")
}

/// Extracts every well-formed review on a review page
///
/// Containers missing an author, date or content element are skipped; the
/// rest of the page is still returned. A page without containers yields an
/// empty vector.
pub fn extract_reviews(doc: &Document, profile: &ExtractionProfile) -> Vec<Review> {
    let html = Html::parse_document(&doc.body);
    let source_url = doc.url.to_string();

    html.select(&profile.review_container)
        .filter_map(|container| extract_review(container, profile, &source_url))
        .collect()
}

fn extract_review(
    container: ElementRef,
    profile: &ExtractionProfile,
    source_url: &str,
) -> Option<Review> {
    Some(Review {
        source_url: source_url.to_string(),
        author: select_text(container, &profile.review_author)?,
        date: select_text(container, &profile.review_date)?,
        content: select_text(container, &profile.review_content)?,
    })
}

fn extract_heading(
    doc: &Document,
    selector: &Selector,
    profile: &'static str,
) -> Result<String, ExtractError> {
    let html = Html::parse_document(&doc.body);

    html.select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| missing(profile, doc))
}

fn select_text(element: ElementRef, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(element_text)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_page_number(profile: &'static str, doc: &Document, text: &str) -> Result<u32, ExtractError> {
    match text.parse::<u32>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(ExtractError::Malformed {
            profile,
            url: doc.url.to_string(),
            text: text.to_string(),
        }),
    }
}

fn missing(profile: &'static str, doc: &Document) -> ExtractError {
    ExtractError::MissingStructure {
        profile,
        url: doc.url.to_string(),
    }
}
