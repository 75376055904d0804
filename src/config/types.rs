use serde::Deserialize;

/// Main configuration structure for Review-Harvest
///
/// Every section is optional; missing keys fall back to the values used for
/// the default target site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host every relative link is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the page listing all top-level categories
    #[serde(rename = "catalog-path")]
    pub catalog_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.eldorado.ru".to_string(),
            catalog_path: "/d".to_string(),
        }
    }
}

/// HTTP request configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the Accept header sent with every request
    pub accept: String,

    /// Value of the User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Delay applied before every request (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/94.0.4606.81 Safari/537.36".to_string(),
            request_delay_ms: 100,
            request_timeout_secs: 30,
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Delay before each product crawled by a listing-page task (milliseconds)
    #[serde(rename = "product-delay-ms")]
    pub product_delay_ms: u64,

    /// Maximum number of category listing pages processed at once
    #[serde(rename = "max-concurrent-listing-pages")]
    pub max_concurrent_listing_pages: u32,

    /// Maximum number of review pages fetched at once
    #[serde(rename = "max-concurrent-review-pages")]
    pub max_concurrent_review_pages: u32,

    /// Upper bound on the page count read from any pagination block
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Number of discovered categories to skip before crawling
    #[serde(rename = "skip-categories")]
    pub skip_categories: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            product_delay_ms: 1000,
            max_concurrent_listing_pages: 8,
            max_concurrent_review_pages: 8,
            max_pages: 10_000,
            skip_categories: 0,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for per-category review directories
    #[serde(rename = "reviews-dir")]
    pub reviews_dir: String,

    /// Path of the log file written next to console output
    #[serde(rename = "log-file")]
    pub log_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reviews_dir: "reviews".to_string(),
            log_file: "harvest.log".to_string(),
        }
    }
}

/// CSS selectors making up the extraction profiles
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    #[serde(rename = "category-link")]
    pub category_link: String,

    /// Container of the listing pagination; only the first match is read
    #[serde(rename = "category-pagination")]
    pub category_pagination: String,

    #[serde(rename = "category-pagination-item")]
    pub category_pagination_item: String,

    #[serde(rename = "category-title")]
    pub category_title: String,

    #[serde(rename = "product-link")]
    pub product_link: String,

    /// Container of the review pagination; only the first match is read
    #[serde(rename = "product-pagination")]
    pub product_pagination: String,

    #[serde(rename = "product-pagination-item")]
    pub product_pagination_item: String,

    #[serde(rename = "product-title")]
    pub product_title: String,

    #[serde(rename = "review-container")]
    pub review_container: String,

    #[serde(rename = "review-author")]
    pub review_author: String,

    #[serde(rename = "review-date")]
    pub review_date: String,

    #[serde(rename = "review-content")]
    pub review_content: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            category_link: "a.ss".to_string(),
            category_pagination: "div.zr".to_string(),
            category_pagination_item: "li".to_string(),
            category_title: "h1.-K".to_string(),
            product_link: "a.sG".to_string(),
            product_pagination: "div.pages".to_string(),
            product_pagination_item: "a".to_string(),
            product_title: "h1.catalogItemDetailHd".to_string(),
            review_container: "div.usersReviewsListItemInnerContainer".to_string(),
            review_author: "span.userName".to_string(),
            review_date: "div.userReviewDate".to_string(),
            review_content: "div.middleBlockItem".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Returns every selector paired with its config key
    pub fn entries(&self) -> [(&'static str, &str); 12] {
        [
            ("category-link", &self.category_link),
            ("category-pagination", &self.category_pagination),
            ("category-pagination-item", &self.category_pagination_item),
            ("category-title", &self.category_title),
            ("product-link", &self.product_link),
            ("product-pagination", &self.product_pagination),
            ("product-pagination-item", &self.product_pagination_item),
            ("product-title", &self.product_title),
            ("review-container", &self.review_container),
            ("review-author", &self.review_author),
            ("review-date", &self.review_date),
            ("review-content", &self.review_content),
        ]
    }
}

/// Command-line values replacing the configured ones
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub skip_categories: Option<usize>,
    pub reviews_dir: Option<String>,
}
