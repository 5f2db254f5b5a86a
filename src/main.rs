//! Crawl-Report main entry point
//!
//! This is the command-line interface for the Crawl-Report viewer.

use anyhow::{bail, Context};
use clap::Parser;
use crawl_report::codec::{decode, Report};
use crawl_report::config::{load_config_with_hash, ViewerConfig};
use crawl_report::controller::{ExpansionSet, Session};
use crawl_report::output::{render_report, render_status, ExportArtifact};
use crawl_report::HttpCrawlService;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Crawl-Report: view and export crawl reports
///
/// Asks a crawl service to crawl a website, shows the resulting report as a
/// table, and can save it as a CSV file. A saved report can also be viewed
/// offline with --input.
#[derive(Parser, Debug)]
#[command(name = "crawl-report")]
#[command(version)]
#[command(about = "View and export crawl reports", long_about = None)]
struct Cli {
    /// Website to crawl
    #[arg(value_name = "URL", required_unless_present = "input")]
    url: Option<String>,

    /// Maximum number of pages the service fetches at once
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
    max_concurrency: Option<u32>,

    /// Maximum number of pages to crawl
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1000))]
    max_pages: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// View a saved report instead of requesting a crawl
    #[arg(long, value_name = "FILE", conflicts_with_all = ["url", "max_concurrency", "max_pages"])]
    input: Option<PathBuf>,

    /// Show details for a row (repeatable)
    #[arg(long = "expand", value_name = "ROW")]
    expand: Vec<usize>,

    /// Show details for every row
    #[arg(long, conflicts_with = "expand")]
    expand_all: bool,

    /// Save the report as <product>_report.csv
    #[arg(long)]
    export: bool,

    /// Directory for the export file (overrides the config)
    #[arg(long, value_name = "DIR", requires = "export")]
    export_dir: Option<PathBuf>,

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

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => ViewerConfig::default(),
    };

    let report = match &cli.input {
        Some(path) => load_saved_report(path)?,
        None => fetch_report(&cli, &config).await?,
    };

    let expansion = build_expansion(&cli, report.len());
    if !cli.quiet {
        print!("{}", render_report(&report, &expansion));
    }

    if cli.export {
        let dir = cli
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.export.directory));
        let artifact = ExportArtifact::from_report(&report, &config.export.product_name);
        let path = artifact.write_to(&dir)?;
        if !cli.quiet {
            println!("Report saved to {}", path.display());
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_report=info,warn"),
            1 => EnvFilter::new("crawl_report=debug,info"),
            2 => EnvFilter::new("crawl_report=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one crawl request through a session and returns the decoded report
async fn fetch_report(cli: &Cli, config: &ViewerConfig) -> anyhow::Result<Report> {
    let service = HttpCrawlService::new(&config.service)?;
    let session = Session::new(service, config.defaults.clone());

    session.update_form(|form| {
        if let Some(url) = &cli.url {
            form.set_url(url.as_str());
        }
        if let Some(n) = cli.max_concurrency {
            form.set_max_concurrency(n);
        }
        if let Some(n) = cli.max_pages {
            form.set_max_pages(n);
        }
    });

    let fetch = session.submit()?;
    if !cli.quiet {
        eprintln!("{}", session.with_state(|s| render_status(s.lifecycle())));
    }
    fetch.await;

    let state = session.snapshot();
    if let Some(message) = state.error() {
        bail!("{}", message);
    }
    if !state.lifecycle().is_settled() {
        bail!("Crawl request ended without a result ({})", state.lifecycle());
    }
    if !cli.quiet {
        eprintln!("{}", render_status(state.lifecycle()));
    }

    Ok(state.report().cloned().unwrap_or_default())
}

/// Decodes a report previously saved to disk
fn load_saved_report(path: &Path) -> anyhow::Result<Report> {
    tracing::info!("Reading saved report from: {}", path.display());
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let report =
        decode(&payload).with_context(|| format!("Failed to decode report {}", path.display()))?;
    tracing::info!("Decoded {} rows", report.len());
    Ok(report)
}

fn build_expansion(cli: &Cli, row_count: usize) -> ExpansionSet {
    let mut expansion = ExpansionSet::new(row_count);
    if cli.expand_all {
        for index in 0..row_count {
            expansion.toggle(index);
        }
    } else {
        for &index in &cli.expand {
            if !expansion.is_expanded(index) && !expansion.toggle(index) {
                tracing::warn!("Row {} does not exist (report has {} rows)", index, row_count);
            }
        }
    }
    expansion
}
