//! # bylaw-api -- Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to `PORT` (default 3001).

use bylaw_api::state::AppConfig;
use bylaw_knowledge::{KnowledgeClient, KnowledgeConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Structured tracing; LOG_FORMAT=json switches to JSON lines.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = AppConfig::from_env();
    let port = config.port;

    let client = match KnowledgeConfig::from_env() {
        Ok(knowledge_config) => {
            tracing::info!(
                endpoint = %knowledge_config.endpoint,
                document_id = %knowledge_config.document_id,
                "knowledge service configured"
            );
            match KnowledgeClient::new(knowledge_config) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::error!("Failed to create knowledge client: {e}");
                    return Err(e.into());
                }
            }
        }
        Err(e) => {
            tracing::warn!(
                "Knowledge service not configured: {e}. Rules and answers will use fallbacks."
            );
            None
        }
    };

    let state = bylaw_api::bootstrap::bootstrap(config, client);
    let app = bylaw_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Bylaw API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
