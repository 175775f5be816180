//! Google求人検索スクレイパー CLI
//!
//! 実行方法:
//! ```
//! cargo run -- "rust developer" --max-scroll 50 --location "New York City"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use google_jobs_scraper::{
    CountingPolicy, JobSearchService, ScraperConfig, SearchRequest, Vocabulary,
};
use tower::Service;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "google-jobs-scraper", about = "Scrape Google job listings and tally tech keywords")]
struct Cli {
    /// Job term to search
    term: String,

    /// Maximum scrolling count
    #[arg(long, env = "GOOGLE_JOBS_MAX_SCROLL", default_value_t = 100)]
    max_scroll: usize,

    /// Location appended to the term (repeatable; one query per location)
    #[arg(long = "location")]
    locations: Vec<String>,

    /// Root directory for result files
    #[arg(long, env = "GOOGLE_JOBS_OUTPUT_DIR", default_value = "results")]
    output_dir: PathBuf,

    /// Milliseconds to wait after each scroll step
    #[arg(long, env = "GOOGLE_JOBS_SCROLL_SETTLE_MS", default_value_t = 2000)]
    scroll_settle_ms: u64,

    /// Seconds to wait for the listing panel before assuming no results
    #[arg(long, env = "GOOGLE_JOBS_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Navigation attempts per query
    #[arg(long, default_value_t = 1)]
    navigation_attempts: u32,

    /// Keyword counting policy: raw or per-record
    #[arg(long, default_value = "raw")]
    counting: CountingPolicy,

    /// Drop identical listings within a query before counting keywords
    #[arg(long)]
    dedupe: bool,

    /// Newline-separated vocabulary file replacing the built-in terms
    #[arg(long)]
    vocabulary: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    show_browser: bool,

    /// Verbose browser logging and a debug screenshot per query
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = ScraperConfig::new()
        .with_headless(!cli.show_browser)
        .with_max_scroll(cli.max_scroll)
        .with_scroll_settle(Duration::from_millis(cli.scroll_settle_ms))
        .with_timeout(Duration::from_secs(cli.timeout_secs))
        .with_navigation_attempts(cli.navigation_attempts)
        .with_debug(cli.debug);

    let mut request = SearchRequest::new(&cli.term)
        .with_locations(cli.locations)
        .with_output_root(cli.output_dir)
        .with_config(config)
        .with_counting(cli.counting)
        .with_dedupe(cli.dedupe);

    if let Some(path) = cli.vocabulary {
        request = request.with_vocabulary(Vocabulary::from_file(path)?);
    }

    let mut service = JobSearchService::new();
    let result = service.call(request).await?;

    println!("Results written to {:?}", result.output_dir);
    for outcome in &result.outcomes {
        println!("  {}: {} listings", outcome.query, outcome.record_count);
    }
    for (query, error) in &result.failures {
        eprintln!("  {}: failed ({})", query, error);
    }

    println!("Top keywords:");
    for (keyword, count) in result.summary.keywords.entries().iter().take(10) {
        println!("  {:<20} {}", keyword, count);
    }

    Ok(())
}
