//! Catalog records: categories, products and reviews

use serde::Serialize;

/// A top-level catalog grouping discovered from the catalog index
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category {
    /// The `/c/<slug>/` path identifying the category
    pub url_path: String,

    /// The slug part of the path
    pub name: String,
}

impl Category {
    /// Builds a category from its `/c/<slug>/` path
    pub fn from_path(url_path: impl Into<String>) -> Self {
        let url_path = url_path.into();
        let name = url_path
            .trim_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Self { url_path, name }
    }
}

/// One listing page of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPage {
    pub category: Category,
    pub page_number: u32,
}

/// A catalog item with its own paginated review listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Absolute URL of the first review page
    pub url: String,

    /// Display name, already safe to use as a file name
    pub name: String,

    /// Number of review pages, always at least 1
    pub page_count: u32,
}

/// One user-submitted review
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    #[serde(rename = "url")]
    pub source_url: String,
    pub author: String,
    pub date: String,
    pub content: String,
}

/// Makes a display name usable as a single path component
///
/// Path separators become `_` and surrounding whitespace is dropped. Names
/// that end up empty become `unnamed`.
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        "unnamed".to_string()
    } else {
        sanitized
    }
}
