//! CLI entry point for the slackfetch tool.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use slackfetch_core::{BatchDownloader, ExportScanner, FileStore, HttpClient};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Slackfetch starting");

    let store = Arc::new(FileStore::new(args.dest));
    let client = HttpClient::new();
    let batch = BatchDownloader::new(usize::from(args.concurrency))?;
    let scanner = ExportScanner::new(client, Arc::clone(&store), batch);

    let summary = scanner.scan(&args.src).await?;

    info!(
        files_parsed = summary.files_parsed,
        urls_found = summary.urls_found,
        completed = summary.completed,
        failed = summary.failed,
        dest = %store.root().display(),
        "Scan complete"
    );

    Ok(())
}
