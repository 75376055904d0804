//! Review-Harvest main entry point
//!
//! This is the command-line interface for the Review-Harvest catalog crawler.

use anyhow::Context;
use clap::Parser;
use review_harvest::config::{apply_overrides, load_config_with_hash, Config, ConfigOverrides};
use review_harvest::crawler::Coordinator;
use review_harvest::output::print_statistics;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Review-Harvest: a catalog review crawler
///
/// Review-Harvest walks every category of a catalog site, collects the user
/// reviews of each product and writes them to one JSON file per product.
#[derive(Parser, Debug)]
#[command(name = "review-harvest")]
#[command(version)]
#[command(about = "A catalog review crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discover and list categories without crawling them
    #[arg(long)]
    dry_run: bool,

    /// Skip the first N discovered categories
    #[arg(long, value_name = "N")]
    skip_categories: Option<usize>,

    /// Root directory for review files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    let overrides = ConfigOverrides {
        skip_categories: cli.skip_categories,
        reviews_dir: cli.output_dir.as_ref().map(|dir| dir.display().to_string()),
    };
    let config = apply_overrides(config, &overrides).context("Invalid command-line override")?;

    // Held until main returns; dropping it flushes the log file
    let _log_guard = setup_logging(cli.verbose, cli.quiet, Path::new(&config.output.log_file))?;

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("Using built-in configuration"),
    }

    let coordinator = Coordinator::new(config).context("Failed to initialize crawler")?;

    if cli.dry_run {
        handle_dry_run(&coordinator).await
    } else {
        handle_crawl(&coordinator).await
    }
}

/// Sets up console and file logging based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, log_file: &Path) -> anyhow::Result<WorkerGuard> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("review_harvest=info,warn"),
            1 => EnvFilter::new("review_harvest=debug,info"),
            2 => EnvFilter::new("review_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", log_file.display()))?;

    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    Ok(guard)
}

/// Handles the --dry-run mode: lists the categories that would be crawled
async fn handle_dry_run(coordinator: &Coordinator) -> anyhow::Result<()> {
    let config = coordinator.config();
    println!("=== Review-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Catalog: {}", config.site.catalog_path);

    println!("\nCrawler:");
    println!("  Request delay: {}ms", config.http.request_delay_ms);
    println!("  Product delay: {}ms", config.crawler.product_delay_ms);
    println!(
        "  Max concurrent listing pages: {}",
        config.crawler.max_concurrent_listing_pages
    );
    println!(
        "  Max concurrent review pages: {}",
        config.crawler.max_concurrent_review_pages
    );

    println!("\nOutput:");
    println!("  Reviews: {}", config.output.reviews_dir);
    println!("  Log: {}", config.output.log_file);

    let categories = coordinator
        .discover_categories()
        .await
        .context("Category discovery failed")?;
    let skip = config.crawler.skip_categories;

    println!("\nCategories ({}):", categories.len());
    for (index, category) in categories.iter().enumerate() {
        let marker = if index < skip { " (skipped)" } else { "" };
        println!("  - {}{}", category.url_path, marker);
    }

    println!(
        "\n✓ Would crawl {} categories",
        categories.len().saturating_sub(skip)
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(coordinator: &Coordinator) -> anyhow::Result<()> {
    match coordinator.run().await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
