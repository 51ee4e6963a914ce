use std::net::SocketAddr;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub search_api_key: Option<String>,
    pub search_engine_id: Option<String>,
    pub search_base_url: String,
    pub request_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub batch_max_concurrent_rows: usize,
    pub rate_limit_per_minute: usize,
}

/// Credentials and endpoint for the external search API.
///
/// Both the interactive and batch paths obtain these from [`AppConfig`];
/// nothing else in the workspace holds a key.
#[derive(Clone)]
pub struct SearchCredentials {
    pub api_key: String,
    pub engine_id: String,
    pub base_url: String,
}

impl AppConfig {
    /// Returns the search API credentials, or the name of the first missing variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when the API key or engine ID
    /// was not provided.
    pub fn search_credentials(&self) -> Result<SearchCredentials, ConfigError> {
        let api_key = self
            .search_api_key
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("PRODPIX_SEARCH_API_KEY".to_string()))?;
        let engine_id = self
            .search_engine_id
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("PRODPIX_SEARCH_ENGINE_ID".to_string()))?;
        Ok(SearchCredentials {
            api_key,
            engine_id,
            base_url: self.search_base_url.clone(),
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "search_api_key",
                &self.search_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("search_engine_id", &self.search_engine_id)
            .field("search_base_url", &self.search_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("batch_max_concurrent_rows", &self.batch_max_concurrent_rows)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}

impl std::fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("api_key", &"[redacted]")
            .field("engine_id", &self.engine_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}
