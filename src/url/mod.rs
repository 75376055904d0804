//! URL handling module for Review-Harvest
//!
//! Builds the absolute URLs the crawler requests: resolving catalog links
//! against the site base and deriving paginated review URLs.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses the configured base URL of the site
pub fn parse_base_url(base: &str) -> UrlResult<Url> {
    let url = Url::parse(base).map_err(|source| UrlError::Parse {
        href: base.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

/// Resolves a link found on a page against the site base URL
///
/// Absolute links are kept as-is; root-relative and relative links are joined
/// onto `base`.
///
/// # Examples
///
/// ```
/// use review_harvest::url::{parse_base_url, resolve_link};
///
/// let base = parse_base_url("https://shop.example.com").unwrap();
/// let url = resolve_link(&base, "/c/phones/").unwrap();
/// assert_eq!(url.as_str(), "https://shop.example.com/c/phones/");
/// ```
pub fn resolve_link(base: &Url, href: &str) -> UrlResult<Url> {
    base.join(href.trim()).map_err(|source| UrlError::Parse {
        href: href.to_string(),
        source,
    })
}

/// Returns the URL of one review page of a product
///
/// Page 1 is the bare product URL; page N > 1 appends `/page/N` to its path.
pub fn review_page_url(product_url: &Url, page: u32) -> Url {
    if page <= 1 {
        return product_url.clone();
    }

    let mut url = product_url.clone();
    let path = format!("{}/page/{}", product_url.path().trim_end_matches('/'), page);
    url.set_path(&path);
    url
}
