//! Category crawler
//!
//! Resolves a category's listing page count, creates its output directory and
//! processes every listing page through the listing pool. Inside one
//! listing-page task the products are crawled one after another, with a fixed
//! delay before each.

use crate::crawler::extract::{
    extract_category_name, extract_category_page_count, extract_product_links,
};
use crate::crawler::product::crawl_product;
use crate::crawler::session::CrawlSession;
use crate::model::{
    sanitize_name, Category, CategoryOutcome, CategoryPage, CategoryReport, CrawlTally,
    SkipReason,
};
use crate::output::OutputError;
use crate::url::resolve_link;
use crate::HarvestError;
use std::path::Path;
use url::Url;

/// Crawls every listing page of one category
///
/// # Returns
///
/// * `Ok(CategoryOutcome::Crawled)` - All listing-page tasks have finished
/// * `Ok(CategoryOutcome::Skipped)` - The first listing page failed, had no
///   heading, or the category directory already exists
/// * `Err(HarvestError)` - The output directory could not be created
pub async fn crawl_category(
    session: &CrawlSession,
    category: &Category,
) -> Result<CategoryOutcome, HarvestError> {
    let category_url = match resolve_link(session.base_url(), &category.url_path) {
        Ok(url) => url,
        Err(e) => return Ok(skip(category, SkipReason::Url(e))),
    };

    let doc = match session.fetcher().fetch(&category_url, &[]).await {
        Ok(doc) => doc,
        Err(e) => return Ok(skip(category, SkipReason::Fetch(e))),
    };

    let name = match extract_category_name(&doc, session.profile()) {
        Ok(name) => sanitize_name(&name),
        Err(e) => return Ok(skip(category, SkipReason::Extract(e))),
    };
    let page_count =
        session.cap_page_count(extract_category_page_count(&doc, session.profile()), &name);

    let directory = match session.store().create_category_dir(&name) {
        Ok(directory) => directory,
        Err(e @ OutputError::DirectoryExists(_)) => {
            return Ok(skip(category, SkipReason::Output(e)))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        "Category '{}' has {} listing page(s), writing to {}",
        name,
        page_count,
        directory.display()
    );

    let pages = (1..=page_count).map(|page_number| CategoryPage {
        category: category.clone(),
        page_number,
    });

    let results = session
        .listing_pool()
        .run(pages, |page| {
            let session = session.clone();
            let category_url = category_url.clone();
            let directory = directory.clone();
            async move { crawl_listing_page(&session, &category_url, page, &directory).await }
        })
        .await;

    let mut tally = CrawlTally {
        listing_pages: page_count,
        listing_pages_failed: results.panicked as u32,
        ..CrawlTally::default()
    };
    for page_tally in &results.completed {
        tally.merge(page_tally);
    }

    Ok(CategoryOutcome::Crawled(CategoryReport {
        name,
        directory,
        tally,
    }))
}

/// Fetches one listing page and crawls its products sequentially
async fn crawl_listing_page(
    session: &CrawlSession,
    category_url: &Url,
    page: CategoryPage,
    directory: &Path,
) -> CrawlTally {
    let mut tally = CrawlTally::default();
    let page_number = page.page_number.to_string();

    let doc = match session
        .fetcher()
        .fetch(category_url, &[("page", page_number.as_str())])
        .await
    {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(
                "Listing page {} of {} failed: {}",
                page.page_number,
                page.category.url_path,
                e
            );
            tally.listing_pages_failed += 1;
            return tally;
        }
    };

    let links = extract_product_links(&doc, session.profile());
    tracing::debug!(
        "{} products on page {} of {}",
        links.len(),
        page.page_number,
        page.category.url_path
    );

    for link in links {
        tokio::time::sleep(session.product_delay()).await;

        match crawl_product(session, &link, directory).await {
            Ok(outcome) => tally.record_product(&outcome),
            Err(e) => {
                tracing::error!("Failed to save product {}: {}", link, e);
                tally.products_failed += 1;
            }
        }
    }

    tally
}

fn skip(category: &Category, reason: SkipReason) -> CategoryOutcome {
    tracing::warn!("Skipping category {}: {}", category.url_path, reason);
    CategoryOutcome::Skipped(reason)
}

