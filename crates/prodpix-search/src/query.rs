use prodpix_core::RetailerProfile;

use crate::error::SearchError;

/// Trims `raw` and rejects it if nothing is left.
///
/// # Errors
///
/// Returns [`SearchError::EmptyTerm`] for empty or whitespace-only input.
pub fn validate_term(raw: &str) -> Result<&str, SearchError> {
    let term = raw.trim();
    if term.is_empty() {
        return Err(SearchError::EmptyTerm);
    }
    Ok(term)
}

/// Prefixes the (trimmed) term with the retailer's brand phrase.
#[must_use]
pub fn build_query(profile: &RetailerProfile, term: &str) -> String {
    let term = term.trim();
    if profile.query_prefix.is_empty() {
        return term.to_string();
    }
    format!("{} {term}", profile.query_prefix)
}
