//! 保存済みの求人JSONから集計テーブルを作り直す
//!
//! 実行方法:
//! ```
//! cargo run --bin summarize -- "results/rust developer 2026-10-19/jobs_all.json"
//! ```

use std::path::PathBuf;

use clap::Parser;
use google_jobs_scraper::persistence::{read_saved_jobs, write_occurrence_tables};
use google_jobs_scraper::{Aggregator, CountingPolicy, Vocabulary};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "summarize", about = "Rebuild keyword tables from scraped job JSON")]
struct Cli {
    /// Jobs JSON file: an array of listings, or an object of query -> listings
    path: PathBuf,

    /// Directory for the tables (defaults to the input file's directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Keyword counting policy: raw or per-record
    #[arg(long, default_value = "raw")]
    counting: CountingPolicy,

    /// Drop identical listings within a query before counting
    #[arg(long)]
    dedupe: bool,

    /// Newline-separated vocabulary file replacing the built-in terms
    #[arg(long)]
    vocabulary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let records = read_saved_jobs(&cli.path)?.into_records(cli.dedupe);
    info!("Loaded {} listings from {:?}", records.len(), cli.path);

    let vocabulary = match &cli.vocabulary {
        Some(path) => Vocabulary::from_file(path)?,
        None => Vocabulary::builtin().clone(),
    };
    let summary = Aggregator::new(&vocabulary, cli.counting).summarize(&records);

    let output_dir = cli.output_dir.unwrap_or_else(|| {
        cli.path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default()
    });
    write_occurrence_tables(&output_dir, &summary)?;

    println!(
        "{} titles, {} employers, {} keywords -> {:?}",
        summary.title_occurrences.len(),
        summary.employer_occurrences.len(),
        summary.keywords.len(),
        output_dir
    );
    Ok(())
}
