//! Rate-limited HTTP fetcher
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the fixed Accept/User-Agent header set
//! - Sleeping a fixed delay before every request
//! - Classifying failures into `FetchError` (no retries)

use crate::config::HttpConfig;
use crate::{FetchError, HarvestError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A fetched HTML document
#[derive(Debug, Clone)]
pub struct Document {
    /// The requested URL, without query parameters
    pub url: Url,

    /// Response body
    pub body: String,
}

impl Document {
    pub fn new(url: Url, body: impl Into<String>) -> Self {
        Self {
            url,
            body: body.into(),
        }
    }
}

/// Builds an HTTP client with the configured header set and timeouts
///
/// # Example
///
/// ```no_run
/// use review_harvest::config::HttpConfig;
/// use review_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, HarvestError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_str(&config.accept)
            .map_err(|e| crate::ConfigError::Validation(format!("accept header: {}", e)))?,
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent)
            .map_err(|e| crate::ConfigError::Validation(format!("user-agent header: {}", e)))?,
    );

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// HTTP fetcher applying a fixed delay before each request
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    request_delay: Duration,
}

impl Fetcher {
    pub fn new(client: Client, request_delay: Duration) -> Self {
        Self {
            client,
            request_delay,
        }
    }

    /// Builds a fetcher from the HTTP section of the configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            client,
            Duration::from_millis(config.request_delay_ms),
        ))
    }

    /// Fetches a URL with the given query parameters
    ///
    /// | Condition           | Result                        |
    /// |---------------------|-------------------------------|
    /// | HTTP 2xx            | `Ok(Document)`                |
    /// | Any other status    | `FetchError::Status`          |
    /// | Request timeout     | `FetchError::Timeout`         |
    /// | Other network error | `FetchError::Transport`       |
    pub async fn fetch(&self, url: &Url, query: &[(&str, &str)]) -> Result<Document, FetchError> {
        tokio::time::sleep(self.request_delay).await;

        tracing::debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("HTTP {} for {}", status.as_u16(), url);
            return Err(FetchError::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        Ok(Document::new(url.clone(), body))
    }
}

/// Maps a reqwest failure onto the fetch error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    let url = url.to_string();
    if error.is_timeout() {
        FetchError::Timeout { url }
    } else {
        FetchError::Transport {
            url,
            message: error.to_string(),
        }
    }
}
