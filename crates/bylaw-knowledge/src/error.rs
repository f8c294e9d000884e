//! Knowledge service client error types.

/// Errors from knowledge service calls.
///
/// Every variant is a dependency-side failure. Resolvers retry on any of
/// them and then degrade; none is surfaced to an API caller.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    /// Transport error, including timeouts and refused connections.
    #[error("HTTP error calling knowledge service: {source}")]
    Http { source: reqwest::Error },
    /// The service answered with a non-2xx status.
    #[error("knowledge service returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body could not be read.
    #[error("failed to read knowledge service response: {source}")]
    Body { source: reqwest::Error },
    /// The reply did not have a usable shape.
    #[error("malformed knowledge service reply: {0}")]
    MalformedReply(String),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl KnowledgeError {
    /// Whether the failure was the request timing out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http { source } if source.is_timeout())
    }
}
