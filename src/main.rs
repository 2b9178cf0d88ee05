//! get-papers-list - PubMed company-affiliation report
//!
//! Searches PubMed and lists papers with at least one author affiliated with a
//! pharmaceutical or biotech company.
//!
//! ## Usage
//! ```bash
//! get-papers-list "cancer immunotherapy" --file results.csv
//! get-papers-list "crispr[Title] AND 2024[dp]" --debug
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use get_papers_list::pubmed::{
    ClientConfig, PubmedClient, DEFAULT_BASE_URL, DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT_SECS,
};
use get_papers_list::{pipeline, report, CompanyKeywordSet, SearchOutcome};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

/// `--debug` raises this crate's events only, on top of `RUST_LOG`
const DEBUG_DIRECTIVE: &str = "get_papers_list=debug";

// ============================================================================
// CLI Definition
// ============================================================================

/// Fetch PubMed papers with pharmaceutical/biotech company affiliated authors
#[derive(Parser)]
#[command(name = "get-papers-list")]
#[command(version, about, long_about = None)]
struct Cli {
    /// PubMed search query (full PubMed query syntax supported)
    query: String,

    /// Write results to this CSV file instead of printing them
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Maximum number of papers to retrieve
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: u32,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// E-utilities base URL
    #[arg(long, default_value = DEFAULT_BASE_URL, hide = true)]
    base_url: String,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so CSV on stdout stays clean)
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));
    if cli.debug {
        filter = filter.add_directive(DEBUG_DIRECTIVE.parse::<Directive>()?);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    // Failures are reported and the run ends early; only usage errors exit non-zero
    if let Err(e) = run_search(cli).await {
        eprintln!("Error: {:#}", e);
    }

    Ok(())
}

// ============================================================================
// Search
// ============================================================================

async fn run_search(cli: Cli) -> Result<()> {
    let config = ClientConfig {
        base_url: cli.base_url,
        max_results: cli.max_results,
        timeout: Duration::from_secs(cli.timeout),
    };
    let client = PubmedClient::new(config).context("Failed to set up PubMed client")?;
    let keywords = CompanyKeywordSet::default();

    let outcome = pipeline::run(&client, &cli.query, &keywords)
        .await
        .context("PubMed query failed")?;

    let rows = match outcome {
        SearchOutcome::NoResults => {
            println!("No results found for query: {}", cli.query);
            return Ok(());
        }
        SearchOutcome::Rows(rows) => rows,
    };

    match cli.file {
        Some(path) => {
            report::save_csv(&path, &rows)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Saved {} papers to {}", rows.len(), path.display());
        }
        None => {
            report::write_csv(std::io::stdout().lock(), &rows).context("Failed to print results")?;
        }
    }

    Ok(())
}
