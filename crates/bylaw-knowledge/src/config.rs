//! Knowledge service client configuration.
//!
//! All three of endpoint, API key and document id are required. A missing
//! value is a [`ConfigError`], which callers treat as "not configured" and
//! skip external calls entirely.

use std::fmt;

use url::Url;
use zeroize::Zeroizing;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the bearer token.
pub const ENV_API_KEY: &str = "BYLAW_KNOWLEDGE_API_KEY";
/// Environment variable holding the query endpoint URL.
pub const ENV_ENDPOINT: &str = "BYLAW_KNOWLEDGE_ENDPOINT";
/// Environment variable holding the bylaw document identifier.
pub const ENV_DOCUMENT_ID: &str = "BYLAW_KNOWLEDGE_DOCUMENT_ID";
/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "BYLAW_KNOWLEDGE_TIMEOUT_SECS";

/// Configuration for connecting to the knowledge service.
///
/// Custom `Debug` implementation redacts the `api_key` field.
#[derive(Clone)]
pub struct KnowledgeConfig {
    /// Full URL queries are POSTed to.
    pub endpoint: Url,
    /// Identifier of the bylaw document the service answers from.
    pub document_id: String,
    /// Bearer token, zeroed on drop.
    pub api_key: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for KnowledgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeConfig")
            .field("endpoint", &self.endpoint)
            .field("document_id", &self.document_id)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl KnowledgeConfig {
    /// Build a configuration with the default timeout.
    pub fn new(endpoint: Url, document_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            document_id: document_id.into(),
            api_key: Zeroizing::new(api_key.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `BYLAW_KNOWLEDGE_API_KEY` (required)
    /// - `BYLAW_KNOWLEDGE_ENDPOINT` (required)
    /// - `BYLAW_KNOWLEDGE_DOCUMENT_ID` (required)
    /// - `BYLAW_KNOWLEDGE_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let api_key = required(ENV_API_KEY)?;
        let raw_endpoint = required(ENV_ENDPOINT)?;
        let document_id = required(ENV_DOCUMENT_ID)?;
        let endpoint = Url::parse(&raw_endpoint)
            .map_err(|e| ConfigError::InvalidUrl(ENV_ENDPOINT.to_string(), e.to_string()))?;

        Ok(Self {
            endpoint,
            document_id,
            api_key: Zeroizing::new(api_key),
            timeout_secs: lookup(ENV_TIMEOUT_SECS)
                .and_then(|s| s.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,
}
