use thiserror::Error;

/// Errors returned by the search pipeline.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The search term was empty after trimming.
    #[error("search term is required")]
    EmptyTerm,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The search API answered with a non-2xx status.
    #[error("search API returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid search base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Errors returned by the upstream image fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid image URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("image URL must use https: {0}")]
    NotHttps(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image host returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },
}
