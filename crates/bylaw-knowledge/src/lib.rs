//! # bylaw-knowledge -- Client for the bylaw knowledge service
//!
//! The knowledge service is an external, LLM-backed retrieval API that
//! answers natural-language questions against a single bylaw document. This
//! crate is the only path to it:
//!
//! - [`KnowledgeClient`]: typed HTTP transport (bearer auth, 30 s timeout).
//! - [`ReplyShape`]: classification of the service's inconsistent replies.
//! - [`with_retry`]: sequential retry with a fixed backoff.
//! - [`KnowledgeService`]: the seam resolvers are written against, so tests
//!   can substitute a scripted service.
//!
//! ## Wire Format
//!
//! ```text
//! POST {endpoint}
//! Authorization: Bearer {api_key}
//! {"query": "...", "document_id": "...", "response_format": "json"}
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod reply;
pub mod retry;

pub use client::KnowledgeClient;
pub use config::{ConfigError, KnowledgeConfig};
pub use error::KnowledgeError;
pub use reply::{Payload, ReplyShape};
pub use retry::{with_retry, RetryPolicy};

use std::future::Future;

use serde_json::Value;

/// Something that can answer a query against a bylaw document.
pub trait KnowledgeService: Send + Sync {
    /// Identifier of the document queries are scoped to.
    fn document_id(&self) -> &str;

    /// Send one query. Implementations make a single attempt.
    fn query(&self, prompt: &str) -> impl Future<Output = Result<Value, KnowledgeError>> + Send;
}

impl KnowledgeService for KnowledgeClient {
    fn document_id(&self) -> &str {
        KnowledgeClient::document_id(self)
    }

    async fn query(&self, prompt: &str) -> Result<Value, KnowledgeError> {
        self.send_query(prompt).await
    }
}
