//! Single-query orchestration: query → search → resolve.

use prodpix_core::RetailerProfile;

use crate::client::SearchClient;
use crate::error::SearchError;
use crate::query::{build_query, validate_term};
use crate::resolve::{resolve, ResolvedImage};

/// Runs the full pipeline for one term.
///
/// `Ok(None)` means the search succeeded but no image suited the retailer.
///
/// # Errors
///
/// - [`SearchError::EmptyTerm`] if `raw_term` is blank; no request is made.
/// - Any error from [`SearchClient::search`].
pub async fn lookup_image(
    client: &SearchClient,
    profile: &RetailerProfile,
    raw_term: &str,
) -> Result<Option<ResolvedImage>, SearchError> {
    let term = validate_term(raw_term)?;
    let query = build_query(profile, term);
    let results = client.search(&query).await?;
    Ok(resolve(profile, &results))
}

/// Lifecycle of one interactive lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState {
    Idle,
    Searching,
    Resolved(ResolvedImage),
    NotFound,
    Errored(String),
}

/// Drives one lookup through `Idle → Searching → Resolved | NotFound | Errored`.
///
/// A single attempt per [`Lookup::run`]; calling `run` again starts over.
#[derive(Debug)]
pub struct Lookup {
    state: LookupState,
}

impl Default for Lookup {
    fn default() -> Self {
        Self::new()
    }
}

impl Lookup {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LookupState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub async fn run(
        &mut self,
        client: &SearchClient,
        profile: &RetailerProfile,
        raw_term: &str,
    ) -> &LookupState {
        self.transition(LookupState::Searching, profile);
        let next = match lookup_image(client, profile, raw_term).await {
            Ok(Some(image)) => LookupState::Resolved(image),
            Ok(None) => LookupState::NotFound,
            Err(e) => {
                tracing::warn!(retailer = %profile.tag, error = %e, "lookup failed");
                LookupState::Errored(e.to_string())
            }
        };
        self.transition(next, profile);
        &self.state
    }

    fn transition(&mut self, next: LookupState, profile: &RetailerProfile) {
        tracing::debug!(
            retailer = %profile.tag,
            from = ?self.state,
            to = ?next,
            "lookup state change"
        );
        self.state = next;
    }
}
