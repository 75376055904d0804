//! Product crawler
//!
//! Resolves a product's review page count, fetches every review page through
//! the review pool and writes the merged reviews to one file.

use crate::crawler::comments::{fetch_review_page, REVIEWS_QUERY};
use crate::crawler::extract::{extract_product_name, extract_product_page_count};
use crate::crawler::session::CrawlSession;
use crate::model::{sanitize_name, Product, ProductOutcome, Review, SkipReason};
use crate::url::resolve_link;
use crate::HarvestError;
use std::path::Path;

/// Crawls every review page of one product
///
/// # Steps
///
/// 1. Fetch the product's first review page; on failure the product is skipped
/// 2. Read the page count and the display name
/// 3. Fetch pages `1..=page_count` concurrently
/// 4. Merge each page's reviews into a buffer owned by this call
/// 5. Write the buffer to `<output_dir>/<name>.json` if it holds any review
///
/// A failed or panicked page is logged and counted; reviews from the other
/// pages are still written.
///
/// # Returns
///
/// * `Ok(ProductOutcome)` - The product was written, empty, or skipped
/// * `Err(HarvestError)` - Writing the review file failed
pub async fn crawl_product(
    session: &CrawlSession,
    product_path: &str,
    output_dir: &Path,
) -> Result<ProductOutcome, HarvestError> {
    let product_url = match resolve_link(session.base_url(), product_path) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Skipping product {}: {}", product_path, e);
            return Ok(ProductOutcome::Skipped(SkipReason::Url(e)));
        }
    };

    let doc = match session.fetcher().fetch(&product_url, &REVIEWS_QUERY).await {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Skipping product {}: {}", product_url, e);
            return Ok(ProductOutcome::Skipped(SkipReason::Fetch(e)));
        }
    };

    let name = match extract_product_name(&doc, session.profile()) {
        Ok(name) => sanitize_name(&name),
        Err(e) => {
            tracing::warn!("Skipping product {}: {}", product_url, e);
            return Ok(ProductOutcome::Skipped(SkipReason::Extract(e)));
        }
    };

    let page_count = session.cap_page_count(
        extract_product_page_count(&doc, session.profile()),
        &name,
    );
    let product = Product {
        url: product_url.to_string(),
        name,
        page_count,
    };

    tracing::debug!(
        "Product '{}' ({}) has {} review page(s)",
        product.name,
        product.url,
        product.page_count
    );

    let pages = session
        .review_pool()
        .run(1..=product.page_count, |page| {
            let session = session.clone();
            let product_url = product_url.clone();
            async move { (page, fetch_review_page(&session, &product_url, page).await) }
        })
        .await;

    let mut reviews: Vec<Review> = Vec::new();
    let mut failed_pages = pages.panicked as u32;
    for (page, result) in pages.completed {
        match result {
            Ok(page_reviews) => reviews.extend(page_reviews),
            Err(e) => {
                tracing::warn!("Review page {} of '{}' failed: {}", page, product.name, e);
                failed_pages += 1;
            }
        }
    }

    if reviews.is_empty() {
        tracing::debug!("No reviews for '{}', nothing written", product.name);
        return Ok(ProductOutcome::NoReviews { failed_pages });
    }

    let path = session
        .store()
        .write_reviews(output_dir, &product.name, &reviews)?;

    tracing::info!(
        "Saved {} reviews for '{}' to {}",
        reviews.len(),
        product.name,
        path.display()
    );

    Ok(ProductOutcome::Written {
        path,
        reviews: reviews.len(),
        failed_pages,
    })
}
