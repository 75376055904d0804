//! Review page fetching for a single product

use crate::crawler::extract::extract_reviews;
use crate::crawler::session::CrawlSession;
use crate::model::Review;
use crate::url::review_page_url;
use crate::FetchError;
use url::Url;

/// Query selecting the reviews view of a product page
pub const REVIEWS_QUERY: [(&str, &str); 1] = [("show", "response")];

/// Fetches one review page of a product and extracts its reviews
///
/// A page that loads but holds no review containers yields an empty vector.
pub async fn fetch_review_page(
    session: &CrawlSession,
    product_url: &Url,
    page: u32,
) -> Result<Vec<Review>, FetchError> {
    let url = review_page_url(product_url, page);
    let doc = session.fetcher().fetch(&url, &REVIEWS_QUERY).await?;
    let reviews = extract_reviews(&doc, session.profile());

    tracing::debug!("{} reviews on page {} of {}", reviews.len(), page, product_url);

    Ok(reviews)
}
