//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small catalog site and run the crawl
//! pipeline end-to-end against it.

use review_harvest::config::Config;
use review_harvest::crawler::{
    crawl_category, crawl_product, fetch_review_page, Coordinator, CrawlSession, Fetcher,
};
use review_harvest::model::{Category, CategoryOutcome, ProductOutcome, SkipReason};
use review_harvest::output::{JsonFileStore, OutputError};
use review_harvest::{FetchError, HarvestError};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches requests without any query string
struct NoQuery;

impl Match for NoQuery {
    fn matches(&self, request: &Request) -> bool {
        request.url.query().is_none()
    }
}

/// Creates a test configuration pointing at the mock server with no delays
fn create_test_config(base_url: &str, reviews_dir: &Path) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.http.request_delay_ms = 0;
    config.crawler.product_delay_ms = 0;
    config.crawler.max_concurrent_listing_pages = 4;
    config.crawler.max_concurrent_review_pages = 4;
    config.output.reviews_dir = reviews_dir.display().to_string();
    config
}

fn create_session(config: &Config) -> CrawlSession {
    let store = Arc::new(JsonFileStore::new(&config.output.reviews_dir));
    CrawlSession::new(config, store).expect("Failed to create session")
}

fn catalog_page(category_paths: &[&str]) -> String {
    let links: String = category_paths
        .iter()
        .map(|p| format!(r#"<a class="ss" href="{}">Category</a>"#, p))
        .collect();
    format!(
        r#"<html><body><nav>{}<a class="ss" href="/promo/">Promo</a></nav></body></html>"#,
        links
    )
}

fn category_page(title: &str, pagination: &[&str]) -> String {
    let items: String = pagination
        .iter()
        .map(|item| format!("<li>{}</li>", item))
        .collect();
    format!(
        r#"<html><body><h1 class="-K">{}</h1><div class="zr"><ul>{}</ul></div></body></html>"#,
        title, items
    )
}

fn listing_page(product_paths: &[&str]) -> String {
    let links: String = product_paths
        .iter()
        .map(|p| format!(r#"<a class="sG" href="{}">Product</a>"#, p))
        .collect();
    format!("<html><body>{}</body></html>", links)
}

fn reviews_html(reviews: &[(&str, &str, &str)]) -> String {
    reviews
        .iter()
        .map(|(author, date, content)| {
            format!(
                r#"<div class="usersReviewsListItemInnerContainer">
                    <span class="userName">{}</span>
                    <div class="userReviewDate"> {} </div>
                    <div class="middleBlockItem"> {} </div>
                </div>"#,
                author, date, content
            )
        })
        .collect()
}

fn product_page(title: &str, page_count: u32, reviews: &[(&str, &str, &str)]) -> String {
    let pagination: String = (2..=page_count)
        .map(|n| format!(r#"<a href="/page/{}">{}</a>"#, n, n))
        .collect();
    format!(
        r#"<html><body><h1 class="catalogItemDetailHd">{}</h1>{}<div class="pages">{}</div></body></html>"#,
        title,
        reviews_html(reviews),
        pagination
    )
}

fn review_page(reviews: &[(&str, &str, &str)]) -> String {
    format!("<html><body>{}</body></html>", reviews_html(reviews))
}

async fn mount_html(server: &MockServer, mock: wiremock::MockBuilder, body: String, hits: u64) {
    mock.respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, mock: wiremock::MockBuilder, status: u16) {
    mock.respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn review_contents(file: &Path) -> Vec<String> {
    let text = std::fs::read_to_string(file).expect("Failed to read review file");
    let reviews: Vec<serde_json::Value> = serde_json::from_str(&text).expect("Invalid JSON");
    let mut contents: Vec<String> = reviews
        .iter()
        .map(|r| r["content"].as_str().unwrap().to_string())
        .collect();
    contents.sort();
    contents
}

/// Mounts a two-category site:
///
/// - Phones: 2 listing pages; p1 (3 review pages), p2 (no reviews), p3 (404)
/// - TVs: no pagination; p4 (1 review)
async fn mount_catalog_site(server: &MockServer) {
    mount_html(
        server,
        Mock::given(method("GET")).and(path("/d")),
        catalog_page(&["/c/phones/", "/c/tvs/"]),
        1,
    )
    .await;

    // Phones
    mount_html(
        server,
        Mock::given(method("GET")).and(path("/c/phones/")).and(NoQuery),
        category_page("Phones", &["1", "2", "Next"]),
        1,
    )
    .await;
    mount_html(
        server,
        Mock::given(method("GET"))
            .and(path("/c/phones/"))
            .and(query_param("page", "1")),
        listing_page(&["/cat/detail/p1/", "/cat/detail/p2/"]),
        1,
    )
    .await;
    mount_html(
        server,
        Mock::given(method("GET"))
            .and(path("/c/phones/"))
            .and(query_param("page", "2")),
        listing_page(&["/cat/detail/p3/"]),
        1,
    )
    .await;

    mount_html(
        server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/p1/"))
            .and(query_param("show", "response")),
        product_page("Phone One 8/128", 3, &[("Jane", "2021-01-01", "first")]),
        2,
    )
    .await;
    mount_html(
        server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/p1/page/2"))
            .and(query_param("show", "response")),
        review_page(&[("Ann", "2021-02-01", "second"), ("Bob", "2021-02-02", "third")]),
        1,
    )
    .await;
    mount_html(
        server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/p1/page/3"))
            .and(query_param("show", "response")),
        review_page(&[("Cid", "2021-03-01", "fourth")]),
        1,
    )
    .await;

    mount_html(
        server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/p2/"))
            .and(query_param("show", "response")),
        product_page("Phone Two", 1, &[]),
        2,
    )
    .await;

    mount_status(
        server,
        Mock::given(method("GET")).and(path("/cat/detail/p3/")),
        404,
    )
    .await;

    // TVs
    mount_html(
        server,
        Mock::given(method("GET")).and(path("/c/tvs/")).and(NoQuery),
        category_page("TVs", &[]),
        1,
    )
    .await;
    mount_html(
        server,
        Mock::given(method("GET"))
            .and(path("/c/tvs/"))
            .and(query_param("page", "1")),
        listing_page(&["/cat/detail/p4/"]),
        1,
    )
    .await;
    mount_html(
        server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/p4/"))
            .and(query_param("show", "response")),
        product_page("Big TV", 1, &[("Dan", "2021-04-01", "fifth")]),
        2,
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_writes_one_file_per_product() {
    let mock_server = MockServer::start().await;
    mount_catalog_site(&mock_server).await;

    let temp = TempDir::new().unwrap();
    let reviews_dir = temp.path().join("reviews");
    let config = create_test_config(&mock_server.uri(), &reviews_dir);

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.categories_discovered, 2);
    assert_eq!(stats.categories_crawled, 2);
    assert_eq!(stats.categories_skipped, 0);
    assert_eq!(stats.tally.listing_pages, 3);
    assert_eq!(stats.tally.products_written, 2);
    assert_eq!(stats.tally.products_without_reviews, 1);
    assert_eq!(stats.tally.products_skipped, 1);
    assert_eq!(stats.tally.reviews_written, 5);

    // All pages merged regardless of completion order
    let phone_file = reviews_dir.join("Phones").join("Phone One 8_128.json");
    assert_eq!(
        review_contents(&phone_file),
        vec!["first", "fourth", "second", "third"]
    );

    let tv_file = reviews_dir.join("TVs").join("Big TV.json");
    assert_eq!(review_contents(&tv_file), vec!["fifth"]);

    // No file for the product without reviews or the missing product
    let phone_files: Vec<_> = std::fs::read_dir(reviews_dir.join("Phones"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(phone_files.len(), 1);
}

#[tokio::test]
async fn test_review_records_are_trimmed_and_sourced() {
    let mock_server = MockServer::start().await;
    mount_catalog_site(&mock_server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());
    Coordinator::new(config).unwrap().run().await.unwrap();

    let text = std::fs::read_to_string(temp.path().join("Phones").join("Phone One 8_128.json"))
        .unwrap();
    let reviews: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
    let jane = reviews
        .iter()
        .find(|r| r["author"] == "Jane")
        .expect("Jane's review is missing");

    assert_eq!(jane["date"], "2021-01-01");
    assert_eq!(jane["content"], "first");
    assert_eq!(
        jane["url"],
        format!("{}/cat/detail/p1/", mock_server.uri()).as_str()
    );

    let cid = reviews.iter().find(|r| r["author"] == "Cid").unwrap();
    assert_eq!(
        cid["url"],
        format!("{}/cat/detail/p1/page/3", mock_server.uri()).as_str()
    );
}

#[tokio::test]
async fn test_existing_category_directory_is_skipped() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/d")),
        catalog_page(&["/c/phones/", "/c/tvs/"]),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/c/phones/")).and(NoQuery),
        category_page("Phones", &["1", "2", "Next"]),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/c/phones/"))
            .and(query_param("page", "1")),
        listing_page(&[]),
        0,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/c/tvs/")).and(NoQuery),
        category_page("TVs", &[]),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/c/tvs/"))
            .and(query_param("page", "1")),
        listing_page(&[]),
        1,
    )
    .await;

    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("Phones")).unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());

    let stats = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(stats.categories_skipped, 1);
    assert_eq!(stats.categories_crawled, 1);
    assert!(temp.path().join("TVs").is_dir());
}

#[tokio::test]
async fn test_crawl_category_reports_directory_exists() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/c/phones/")).and(NoQuery),
        category_page("Phones", &[]),
        1,
    )
    .await;

    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("Phones")).unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());
    let session = create_session(&config);

    let outcome = crawl_category(&session, &Category::from_path("/c/phones/"))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        CategoryOutcome::Skipped(SkipReason::Output(OutputError::DirectoryExists(_)))
    ));
}

#[tokio::test]
async fn test_five_listing_pages_are_each_fetched_once() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/c/phones/")).and(NoQuery),
        category_page("Phones", &["1", "2", "3", "...", "5", "Next"]),
        1,
    )
    .await;
    for page in 1..=5 {
        mount_html(
            &mock_server,
            Mock::given(method("GET"))
                .and(path("/c/phones/"))
                .and(query_param("page", page.to_string().as_str())),
            listing_page(&[]),
            1,
        )
        .await;
    }

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());
    let session = create_session(&config);

    let outcome = crawl_category(&session, &Category::from_path("/c/phones/"))
        .await
        .unwrap();

    match outcome {
        CategoryOutcome::Crawled(report) => {
            assert_eq!(report.name, "Phones");
            assert_eq!(report.tally.listing_pages, 5);
            assert_eq!(report.tally.listing_pages_failed, 0);
        }
        CategoryOutcome::Skipped(reason) => panic!("category skipped: {}", reason),
    }
}

#[tokio::test]
async fn test_failed_listing_page_does_not_stop_siblings() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/c/tvs/")).and(NoQuery),
        category_page("TVs", &["1", "2", "Next"]),
        1,
    )
    .await;
    mount_status(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/c/tvs/"))
            .and(query_param("page", "1")),
        503,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/c/tvs/"))
            .and(query_param("page", "2")),
        listing_page(&["/cat/detail/p4/"]),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/p4/"))
            .and(query_param("show", "response")),
        product_page("Big TV", 1, &[("Dan", "2021-04-01", "fifth")]),
        2,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());
    let session = create_session(&config);

    let outcome = crawl_category(&session, &Category::from_path("/c/tvs/"))
        .await
        .unwrap();

    let CategoryOutcome::Crawled(report) = outcome else {
        panic!("category should be crawled");
    };
    assert_eq!(report.tally.listing_pages_failed, 1);
    assert_eq!(report.tally.products_written, 1);
    assert!(temp.path().join("TVs").join("Big TV.json").is_file());
}

#[tokio::test]
async fn test_skip_categories_setting() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/d")),
        catalog_page(&["/c/tvs/", "/c/phones/"]),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/c/phones/")),
        category_page("Phones", &[]),
        0,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/c/tvs/")).and(NoQuery),
        category_page("TVs", &[]),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/c/tvs/"))
            .and(query_param("page", "1")),
        listing_page(&[]),
        1,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), temp.path());
    config.crawler.skip_categories = 1;

    let stats = Coordinator::new(config).unwrap().run().await.unwrap();

    // Categories are ordered by path, so "/c/phones/" comes first
    assert_eq!(stats.categories_discovered, 2);
    assert_eq!(stats.categories_ignored, 1);
    assert_eq!(stats.categories_crawled, 1);
}

#[tokio::test]
async fn test_discovery_without_category_links_fails() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")).and(path("/d")),
        "<html><body><p>Maintenance</p></body></html>".to_string(),
        1,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());

    let result = Coordinator::new(config).unwrap().run().await;
    assert!(matches!(result, Err(HarvestError::Extract(_))));
}

#[tokio::test]
async fn test_discovery_fetch_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, Mock::given(method("GET")).and(path("/d")), 500).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());

    let result = Coordinator::new(config).unwrap().discover_categories().await;
    assert!(matches!(
        result,
        Err(HarvestError::Fetch(FetchError::Status {
            status_code: 500,
            ..
        }))
    ));
}

#[tokio::test]
async fn test_product_404_is_skipped_without_file() {
    let mock_server = MockServer::start().await;
    mount_status(
        &mock_server,
        Mock::given(method("GET")).and(path("/cat/detail/gone/")),
        404,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());
    let session = create_session(&config);

    let outcome = crawl_product(&session, "/cat/detail/gone/", temp.path())
        .await
        .unwrap();

    match outcome {
        ProductOutcome::Skipped(SkipReason::Fetch(e)) => assert_eq!(e.status_code(), Some(404)),
        other => panic!("expected a skipped product, got {:?}", other),
    }
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_product_without_reviews_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/quiet/"))
            .and(query_param("show", "response")),
        product_page("Quiet Phone", 2, &[]),
        2,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/quiet/page/2"))
            .and(query_param("show", "response")),
        review_page(&[]),
        1,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());
    let session = create_session(&config);

    let outcome = crawl_product(&session, "/cat/detail/quiet/", temp.path())
        .await
        .unwrap();

    assert!(matches!(outcome, ProductOutcome::NoReviews { failed_pages: 0 }));
    assert!(!temp.path().join("Quiet Phone.json").exists());
}

#[tokio::test]
async fn test_failed_review_page_keeps_partial_results() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/flaky/"))
            .and(query_param("show", "response")),
        product_page("Flaky Phone", 3, &[("Jane", "2021-01-01", "one")]),
        2,
    )
    .await;
    mount_status(
        &mock_server,
        Mock::given(method("GET")).and(path("/cat/detail/flaky/page/2")),
        500,
    )
    .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/flaky/page/3"))
            .and(query_param("show", "response")),
        review_page(&[("Ann", "2021-01-03", "three"), ("Ann", "2021-01-03", "three")]),
        1,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());
    let session = create_session(&config);

    let outcome = crawl_product(&session, "/cat/detail/flaky/", temp.path())
        .await
        .unwrap();

    match outcome {
        ProductOutcome::Written {
            path,
            reviews,
            failed_pages,
        } => {
            assert_eq!(reviews, 3);
            assert_eq!(failed_pages, 1);
            // Duplicates are kept
            assert_eq!(review_contents(&path), vec!["one", "three", "three"]);
        }
        other => panic!("expected written reviews, got {:?}", other),
    }
}

#[tokio::test]
async fn test_oversized_review_pagination_is_capped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cat/detail/huge/"))
        .and(query_param("show", "response"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><body><h1 class="catalogItemDetailHd">Huge</h1>{}<div class="pages"><a>2</a><a>4294967295</a></div></body></html>"#,
            reviews_html(&[("Jane", "2021-01-01", "one")])
        )))
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/huge/page/2"))
            .and(query_param("show", "response")),
        review_page(&[("Ann", "2021-01-02", "two")]),
        1,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), temp.path());
    config.crawler.max_pages = 2;
    let session = create_session(&config);

    let outcome = crawl_product(&session, "/cat/detail/huge/", temp.path())
        .await
        .unwrap();

    match outcome {
        ProductOutcome::Written {
            reviews,
            failed_pages,
            ..
        } => {
            assert_eq!(reviews, 2);
            assert_eq!(failed_pages, 0);
        }
        other => panic!("expected written reviews, got {:?}", other),
    }
}

/// Collects formatted log output in memory
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_failed_product_fetch_is_warned_once() {
    let mock_server = MockServer::start().await;
    mount_status(
        &mock_server,
        Mock::given(method("GET")).and(path("/cat/detail/gone/")),
        404,
    )
    .await;

    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());
    let session = create_session(&config);

    crawl_product(&session, "/cat/detail/gone/", temp.path())
        .await
        .unwrap();

    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    let warnings: Vec<&str> = logs.lines().filter(|line| line.contains("WARN")).collect();
    assert_eq!(warnings.len(), 1, "unexpected warnings: {:?}", warnings);
    assert!(warnings[0].contains("/cat/detail/gone/"));
}

#[tokio::test]
async fn test_fetch_review_page_without_reviews_is_empty() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        Mock::given(method("GET"))
            .and(path("/cat/detail/p1/page/4"))
            .and(query_param("show", "response")),
        review_page(&[]),
        1,
    )
    .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp.path());
    let session = create_session(&config);
    let product_url = url::Url::parse(&format!("{}/cat/detail/p1/", mock_server.uri())).unwrap();

    let reviews = fetch_review_page(&session, &product_url, 4).await.unwrap();
    assert!(reviews.is_empty());
}

#[tokio::test]
async fn test_fetcher_sends_configured_headers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", "TestAgent/1.0"))
        .and(header("accept", "text/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.http.user_agent = "TestAgent/1.0".to_string();
    config.http.accept = "text/html".to_string();
    config.http.request_delay_ms = 0;
    let fetcher = Fetcher::from_config(&config.http).unwrap();

    let url = url::Url::parse(&format!("{}/page", mock_server.uri())).unwrap();
    let doc = fetcher.fetch(&url, &[]).await.unwrap();
    assert_eq!(doc.body, "<html></html>");
    assert_eq!(doc.url, url);
}

#[tokio::test]
async fn test_fetcher_reports_status_errors() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, Mock::given(method("GET")), 404).await;

    let fetcher = Fetcher::new(reqwest::Client::new(), Duration::ZERO);
    let url = url::Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();

    let result = fetcher.fetch(&url, &[("show", "response")]).await;
    assert!(matches!(
        result,
        Err(FetchError::Status {
            status_code: 404,
            ..
        })
    ));
}

#[tokio::test]
async fn test_fetcher_converts_timeouts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let fetcher = Fetcher::new(client, Duration::ZERO);
    let url = url::Url::parse(&format!("{}/slow", mock_server.uri())).unwrap();

    let result = fetcher.fetch(&url, &[]).await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_fetcher_applies_request_delay() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        Mock::given(method("GET")),
        "<html></html>".to_string(),
        2,
    )
    .await;

    let fetcher = Fetcher::new(reqwest::Client::new(), Duration::from_millis(50));
    let url = url::Url::parse(&format!("{}/", mock_server.uri())).unwrap();

    let start = std::time::Instant::now();
    fetcher.fetch(&url, &[]).await.unwrap();
    fetcher.fetch(&url, &[]).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(100));
}
