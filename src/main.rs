//! Main entry point for the ccfetch CLI application.
//!
//! Wires the collaborators around the record-extraction pipeline: index
//! lookup, archive storage client with retry, output directory, Ctrl-C
//! cancellation, and the closing summary line.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ccfetch::{
    Cli, ContentClassifier, DocumentSink, HttpRangeFetcher, IndexClient, Pipeline, Retrying,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let index = IndexClient::new(cli.index_url.as_str()).context("building index client")?;
    let entries = index
        .lookup(&cli.crawl, &cli.url_pattern)
        .await
        .with_context(|| format!("looking up {} in {}", cli.url_pattern, cli.crawl))?;

    if entries.is_empty() {
        if !cli.is_quiet() {
            println!("No captures of {} in {}", cli.url_pattern, cli.crawl);
        }
        return Ok(());
    }

    tokio::fs::create_dir_all(&cli.output_dir)
        .await
        .with_context(|| format!("creating output directory {}", cli.output_dir))?;

    let fetcher = Retrying::new(
        HttpRangeFetcher::new(cli.storage_url.as_str()).context("building storage client")?,
        cli.retries,
    );

    let pipeline = Pipeline::new(
        fetcher,
        ContentClassifier::new(),
        DocumentSink::new(&cli.output_dir),
        cli.variant(),
    )
    .quiet(cli.is_quiet());

    // Ctrl-C finishes the in-flight record, then stops the run.
    let cancel = pipeline.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupt received, finishing current record");
            cancel.cancel();
        }
    });

    let summary = pipeline.run(&entries).await;

    if !cli.is_very_quiet() {
        eprintln!(
            "\nSaved {} of {} records ({} failed{})",
            summary.stored.len(),
            summary.total,
            summary.failures.len(),
            if summary.cancelled {
                ", cancelled early"
            } else {
                ""
            }
        );
    }

    Ok(())
}
