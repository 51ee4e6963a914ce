//! HTTP client for the Programmable Search JSON API.
//!
//! Wraps `reqwest` with API key management, URL construction, and typed
//! response deserialization. Any non-2xx response is a hard failure for the
//! call; nothing is retried.

use std::time::Duration;

use prodpix_core::SearchCredentials;
use reqwest::{Client, Url};

use crate::error::SearchError;
use crate::types::SearchResultSet;

const SEARCH_PATH: &str = "customsearch/v1";

/// Client for the external search API.
///
/// Use [`SearchClient::new`] with credentials from configuration, or
/// [`SearchClient::with_base_url`] to point at a mock server in tests.
pub struct SearchClient {
    client: Client,
    api_key: String,
    engine_id: String,
    endpoint: Url,
}

impl SearchClient {
    /// Creates a client from configured credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(credentials: &SearchCredentials, timeout_secs: u64) -> Result<Self, SearchError> {
        Self::with_base_url(
            &credentials.api_key,
            &credentials.engine_id,
            timeout_secs,
            &credentials.base_url,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        engine_id: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("prodpix/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(SEARCH_PATH))
            .map_err(|e| SearchError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            engine_id: engine_id.to_owned(),
            endpoint,
        })
    }

    /// Runs one search and returns the parsed result set.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Http`] on network failure.
    /// - [`SearchError::UnexpectedStatus`] on any non-2xx HTTP status.
    /// - [`SearchError::Deserialize`] if the body is not the expected JSON.
    pub async fn search(&self, query: &str) -> Result<SearchResultSet, SearchError> {
        let url = self.build_url(query);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.redacted_url(query).to_string(),
            });
        }

        let body = response.text().await?;
        let results: SearchResultSet =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;

        tracing::debug!(query, items = results.items.len(), "search completed");
        Ok(results)
    }

    /// Builds the request URL with percent-encoded `key`, `cx`, and `q`.
    fn build_url(&self, query: &str) -> Url {
        self.url_with_key(&self.api_key, query)
    }

    /// Same as [`Self::build_url`] with the key masked, for error messages.
    fn redacted_url(&self, query: &str) -> Url {
        self.url_with_key("[redacted]", query)
    }

    fn url_with_key(&self, key: &str, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", key)
            .append_pair("cx", &self.engine_id)
            .append_pair("q", query);
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
