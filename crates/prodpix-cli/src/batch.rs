//! `batch` command: CSV in, zip archive out, progress on stderr.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use prodpix_batch::{
    plan_batch, read_input, run_batch, BatchOptions, BatchState, LiveImageSource, ProcessingStatus,
    StatusReporter,
};
use prodpix_core::{AppConfig, RetailerTag};
use prodpix_search::{ImageFetcher, SearchClient};
use tokio::sync::watch;

#[derive(Debug)]
pub(crate) struct BatchArgs {
    pub retailer: RetailerTag,
    pub input: PathBuf,
    pub output: PathBuf,
    pub id_column: Option<String>,
    pub concurrency: Option<NonZeroUsize>,
    pub dry_run: bool,
}

/// Runs a batch and prints the summary.
///
/// Row failures are reported but do not make the command fail. The output
/// file is removed if the run aborts.
///
/// # Errors
///
/// Returns an error if the input cannot be opened or parsed, the identifier
/// column is missing, credentials are not configured, or the archive cannot
/// be finalized.
pub(crate) async fn run_batch_command(config: &AppConfig, args: BatchArgs) -> anyhow::Result<()> {
    let profile = args.retailer.profile();
    let input = File::open(&args.input)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", args.input.display()))?;

    if args.dry_run {
        let parsed = read_input(BufReader::new(input))?;
        let plan = plan_batch(profile, &parsed, args.id_column.as_deref())?;
        println!(
            "dry-run: would look up {} rows from column \"{}\" for {} ({} blank rows skipped)",
            plan.total(),
            plan.column,
            profile.name,
            plan.skipped_blank
        );
        return Ok(());
    }

    let credentials = config.search_credentials()?;
    let client = SearchClient::new(&credentials, config.request_timeout_secs)
        .map_err(|e| anyhow::anyhow!("failed to build search client: {e}"))?;
    let fetcher = ImageFetcher::new(config.request_timeout_secs, &config.fetch_user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build image fetcher: {e}"))?;
    let source = LiveImageSource::new(client, fetcher);

    let output = File::create(&args.output)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", args.output.display()))?;
    let options = BatchOptions {
        id_column: args.id_column,
        max_concurrent_rows: args
            .concurrency
            .map_or(config.batch_max_concurrent_rows, NonZeroUsize::get),
    };

    let (reporter, rx) = StatusReporter::new();
    let progress = tokio::spawn(print_progress(rx));

    let result = run_batch(
        &source,
        profile,
        BufReader::new(input),
        BufWriter::new(output),
        &options,
        &reporter,
    )
    .await;
    drop(reporter);
    progress.await?;

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            if let Err(rm) = std::fs::remove_file(&args.output) {
                tracing::warn!(
                    path = %args.output.display(),
                    error = %rm,
                    "could not remove partial archive"
                );
            }
            return Err(e.into());
        }
    };

    for failure in &summary.failures {
        eprintln!("row {} ({}): {}", failure.row, failure.identifier, failure.error);
    }
    println!("{} -> {}", summary.message(), args.output.display());
    Ok(())
}

/// Prints one line per finished row until the reporter is dropped.
async fn print_progress(mut rx: watch::Receiver<ProcessingStatus>) {
    let mut last_processed = 0;
    while rx.changed().await.is_ok() {
        let status = rx.borrow_and_update().clone();
        if status.state == BatchState::Processing && status.processed > last_processed {
            last_processed = status.processed;
            eprintln!(
                "[{}/{}] {}",
                status.processed,
                status.total,
                status.current_item.as_deref().unwrap_or_default()
            );
        }
    }
}
