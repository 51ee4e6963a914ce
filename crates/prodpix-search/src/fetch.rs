//! Server-side fetch of third-party product images.
//!
//! Retailer CDNs often refuse hotlinked or cross-origin requests, so images
//! are always pulled from here with browser-like headers. The fetcher holds
//! no per-call state and may be shared across any number of concurrent calls.

use std::time::Duration;

use reqwest::{header, Client, Url};

use crate::error::FetchError;

pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";

/// Parses `raw` and requires an `https` scheme.
///
/// # Errors
///
/// - [`FetchError::InvalidTarget`] if `raw` is not an absolute URL.
/// - [`FetchError::NotHttps`] for any scheme other than `https`.
pub fn validate_target(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidTarget {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "https" {
        return Err(FetchError::NotHttps(raw.to_string()));
    }
    Ok(url)
}

#[derive(Clone)]
pub struct ImageFetcher {
    client: Client,
}

/// A successful upstream response whose body has not been read yet.
pub struct UpstreamImage {
    pub content_type: String,
    response: reqwest::Response,
}

impl ImageFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Validates `raw` and fetches it. See [`Self::fetch_url`].
    ///
    /// # Errors
    ///
    /// Any error from [`validate_target`] or [`Self::fetch_url`].
    pub async fn fetch(&self, raw: &str) -> Result<UpstreamImage, FetchError> {
        let url = validate_target(raw)?;
        self.fetch_url(url).await
    }

    /// Sends the GET and checks the status. The scheme is not re-checked
    /// here; callers holding an unvalidated string should use [`Self::fetch`].
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failure.
    /// - [`FetchError::UnexpectedStatus`] on any non-2xx status.
    pub async fn fetch_url(&self, url: Url) -> Result<UpstreamImage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, IMAGE_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        tracing::debug!(url = %url, content_type = %content_type, "fetched upstream image");
        Ok(UpstreamImage {
            content_type,
            response,
        })
    }
}

impl UpstreamImage {
    /// Reads the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the body cannot be read.
    pub async fn into_bytes(self) -> Result<Vec<u8>, FetchError> {
        Ok(self.response.bytes().await?.to_vec())
    }

    /// Hands back the raw response so the body can be streamed.
    #[must_use]
    pub fn into_response(self) -> reqwest::Response {
        self.response
    }
}
