//! Kuchikomi main entry point
//!
//! This is the command-line interface for the kuchikomi review extractor.

use anyhow::Context;
use clap::Parser;
use kuchikomi::config::{default_config, load_config, Config};
use kuchikomi::output::{default_csv_filename, CsvSink, ReviewSink};
use kuchikomi::scraper::scrape;
use kuchikomi::url::resolve_start_input;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Kuchikomi: a paginated product-review extractor
///
/// Kuchikomi walks a review listing page by page, following next-page
/// links until the sequence ends, and exports every extracted review to
/// a CSV file. It fetches one page at a time with a fixed delay between
/// pages.
#[derive(Parser, Debug)]
#[command(name = "kuchikomi")]
#[command(version = "1.0.0")]
#[command(about = "A paginated product-review extractor", long_about = None)]
struct Cli {
    /// Product identifier (ASIN, e.g. B0C2CKT9VR) or a full starting URL
    #[arg(value_name = "INPUT")]
    input: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Inter-page delay in seconds (overrides config)
    #[arg(long, value_name = "SECONDS")]
    delay_seconds: Option<u64>,

    /// CSV output path (overrides config; defaults to a timestamped name)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config, show the resolved plan, and exit without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration and apply CLI overrides
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        }
        None => default_config().context("failed to build default configuration")?,
    };

    if let Some(delay) = cli.delay_seconds {
        config.scraper.delay_seconds = delay;
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = Some(output.display().to_string());
    }

    // Resolve the run input into a starting address
    let origin = Url::parse(&config.scraper.origin).context("invalid configured origin")?;
    let start = resolve_start_input(&cli.input, &origin)
        .with_context(|| format!("could not resolve input '{}'", cli.input))?;

    if cli.dry_run {
        handle_dry_run(&config, &start);
        return Ok(());
    }

    handle_scrape(config, start).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kuchikomi=info,warn"),
            1 => EnvFilter::new("kuchikomi=debug,info"),
            2 => EnvFilter::new("kuchikomi=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved plan without fetching
fn handle_dry_run(config: &Config, start: &Url) {
    println!("=== Kuchikomi Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Inter-page delay: {}s", config.scraper.delay_seconds);
    println!("  Origin: {}", config.scraper.origin);

    println!("\nClient:");
    println!("  User-Agent: {}", config.client.user_agent);
    println!("  Accept-Language: {}", config.client.accept_language);

    println!("\nOutput:");
    println!(
        "  CSV path: {}",
        config
            .output
            .csv_path
            .as_deref()
            .unwrap_or("(timestamped default)")
    );

    println!("\n✓ Configuration is valid");
    println!("✓ Would start scraping at {}", start);
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, start: Url) -> anyhow::Result<()> {
    tracing::info!("Starting scrape at {}", start);

    // A Ctrl-C flips the channel; the engine stops at the next inter-page
    // wait and returns whatever it has accumulated.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after current page");
            let _ = cancel_tx.send(true);
        }
    });

    let report = scrape(&config, start, Some(cancel_rx))
        .await
        .context("failed to start scrape")?;

    if report.reason.is_failure() {
        tracing::warn!(
            "Run stopped early ({}); keeping {} reviews collected so far",
            report.reason,
            report.review_count()
        );
    }

    println!("Total reviews scraped: {}", report.review_count());

    if report.reviews.is_empty() {
        println!("No reviews scraped.");
        return Ok(());
    }

    // Export the result set
    let csv_path = config
        .output
        .csv_path
        .clone()
        .unwrap_or_else(default_csv_filename);
    let mut sink = CsvSink::new(&csv_path);
    sink.write_reviews(&report.reviews)
        .with_context(|| format!("failed to write CSV to {}", csv_path))?;

    println!("Reviews have been saved to {}", csv_path);

    Ok(())
}
