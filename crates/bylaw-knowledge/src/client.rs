//! Typed client for the knowledge service query endpoint.
//!
//! One operation: POST a natural-language query scoped to a document and
//! return whatever came back as a [`serde_json::Value`]. A body that is not
//! JSON is returned as a JSON string so that [`crate::reply::ReplyShape`]
//! can still look for an embedded object in it.
//!
//! Retries are not built into the client; callers wrap calls in
//! [`crate::retry::with_retry`].

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::{ConfigError, KnowledgeConfig};
use crate::error::KnowledgeError;

/// Request body accepted by the query endpoint.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub document_id: &'a str,
    pub response_format: &'static str,
}

/// Client for the knowledge service.
#[derive(Debug, Clone)]
pub struct KnowledgeClient {
    http: reqwest::Client,
    endpoint: Url,
    document_id: String,
}

impl KnowledgeClient {
    /// Create a client from configuration.
    pub fn new(config: KnowledgeConfig) -> Result<Self, KnowledgeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut auth = reqwest::header::HeaderValue::from_str(&format!(
                    "Bearer {}",
                    config.api_key.as_str()
                ))
                .map_err(|_| KnowledgeError::Config(ConfigError::InvalidApiKey))?;
                auth.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, auth);
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| KnowledgeError::Http { source: e })?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
            document_id: config.document_id,
        })
    }

    /// Document the service answers from.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Send one query. Single attempt, bounded by the client timeout.
    pub async fn send_query(&self, query: &str) -> Result<Value, KnowledgeError> {
        let body = QueryRequest {
            query,
            document_id: &self.document_id,
            response_format: "json",
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| KnowledgeError::Http { source: e })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| KnowledgeError::Body { source: e })?;

        if !status.is_success() {
            return Err(KnowledgeError::Status {
                status: status.as_u16(),
                body: truncate(&text, 512),
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = text.len(), "knowledge service replied");
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
