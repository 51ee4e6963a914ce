//! `search` command: one interactive lookup printed to stdout.

use prodpix_core::{AppConfig, RetailerTag};
use prodpix_search::{Lookup, LookupState, SearchClient};

/// Prints the resolved image URL, or a "no match" line on a miss.
///
/// # Errors
///
/// Returns an error if search credentials are missing, the client cannot be
/// built, or the lookup ends in the errored state.
pub(crate) async fn run_search(
    config: &AppConfig,
    retailer: RetailerTag,
    term: &str,
) -> anyhow::Result<()> {
    let credentials = config.search_credentials()?;
    let client = SearchClient::new(&credentials, config.request_timeout_secs)
        .map_err(|e| anyhow::anyhow!("failed to build search client: {e}"))?;
    let profile = retailer.profile();

    let mut lookup = Lookup::new();
    match lookup.run(&client, profile, term).await {
        LookupState::Resolved(image) => println!("{image}"),
        LookupState::NotFound => println!("no match for \"{}\" at {}", term.trim(), profile.name),
        LookupState::Errored(message) => anyhow::bail!("lookup failed: {message}"),
        LookupState::Idle | LookupState::Searching => anyhow::bail!("lookup did not finish"),
    }

    Ok(())
}
