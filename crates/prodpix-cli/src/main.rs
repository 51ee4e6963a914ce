mod batch;
mod search;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use prodpix_core::RetailerTag;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "prodpix-cli")]
#[command(about = "Retailer product image lookup and bulk download")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve the product image for one search term
    Search {
        /// Retailer whose naming convention applies (target, walmart, homedepot, lowes)
        #[arg(long)]
        retailer: RetailerTag,
        /// Search term; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },
    /// Download one image per CSV row into a zip archive
    Batch {
        /// Retailer whose naming convention applies (target, walmart, homedepot, lowes)
        #[arg(long)]
        retailer: RetailerTag,
        /// CSV file with a header row
        #[arg(long)]
        input: PathBuf,
        /// Zip archive to write
        #[arg(long)]
        output: PathBuf,
        /// Identifier column, overriding the retailer's default
        #[arg(long)]
        id_column: Option<String>,
        /// Rows processed at once (defaults to `PRODPIX_BATCH_MAX_CONCURRENT_ROWS`)
        #[arg(long)]
        concurrency: Option<NonZeroUsize>,
        /// Validate the input and count rows without any network calls
        #[arg(long)]
        dry_run: bool,
    },
    /// List supported retailers
    Retailers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = prodpix_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Search { retailer, term }) => {
            search::run_search(&config, retailer, &term.join(" ")).await?;
        }
        Some(Commands::Batch {
            retailer,
            input,
            output,
            id_column,
            concurrency,
            dry_run,
        }) => {
            batch::run_batch_command(
                &config,
                batch::BatchArgs {
                    retailer,
                    input,
                    output,
                    id_column,
                    concurrency,
                    dry_run,
                },
            )
            .await?;
        }
        Some(Commands::Retailers) => print_retailers(),
        None => println!("prodpix-cli: no command given; run with --help"),
    }

    Ok(())
}

fn print_retailers() {
    println!(
        "{:<10} {:<12} {:<12} {:<14} fallback",
        "tag", "name", "prefix", "batch column"
    );
    for tag in RetailerTag::ALL {
        let profile = tag.profile();
        println!(
            "{:<10} {:<12} {:<12} {:<14} {}",
            tag.as_str(),
            profile.name,
            profile.query_prefix,
            profile.batch_column,
            if profile.allow_fallback { "yes" } else { "no" }
        );
    }
}
