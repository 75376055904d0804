use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig, SelectorConfig, SiteConfig};
use crate::ConfigError;
use reqwest::header::HeaderValue;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates the target site settings
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if !config.catalog_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "catalog_path must start with '/', got '{}'",
            config.catalog_path
        )));
    }

    Ok(())
}

/// Validates request headers and timing
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    for (name, value) in [("accept", &config.accept), ("user_agent", &config.user_agent)] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
        HeaderValue::from_str(value).map_err(|_| {
            ConfigError::Validation(format!("{} is not a valid header value", name))
        })?;
    }

    if config.request_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be <= 60000ms, got {}ms",
            config.request_delay_ms
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 600, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    for (name, limit) in [
        ("max_concurrent_listing_pages", config.max_concurrent_listing_pages),
        ("max_concurrent_review_pages", config.max_concurrent_review_pages),
    ] {
        if !(1..=100).contains(&limit) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and 100, got {}",
                name, limit
            )));
        }
    }

    if !(1..=100_000).contains(&config.max_pages) {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and 100000, got {}",
            config.max_pages
        )));
    }

    if config.product_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "product_delay_ms must be <= 60000ms, got {}ms",
            config.product_delay_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.reviews_dir.is_empty() {
        return Err(ConfigError::Validation(
            "reviews_dir cannot be empty".to_string(),
        ));
    }

    if config.log_file.is_empty() {
        return Err(ConfigError::Validation(
            "log_file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that every extraction selector compiles
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (field, selector) in config.entries() {
        Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector {
            field,
            selector: selector.to_string(),
        })?;
    }
    Ok(())
}
