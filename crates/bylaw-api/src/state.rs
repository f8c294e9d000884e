//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The state holds no mutable data. It carries the two resolvers, each
//! wrapping the same optional knowledge client, and the default rule set
//! the rule resolver falls back to. Everything is built once at startup.

use std::path::PathBuf;
use std::sync::Arc;

use bylaw_core::RuleSet;
use bylaw_knowledge::{KnowledgeClient, RetryPolicy};
use bylaw_resolver::{AnswerResolver, RuleResolver};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Environment variable naming a default-rules JSON file.
pub const ENV_DEFAULT_RULES: &str = "BYLAW_DEFAULT_RULES";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Default-rules override file. Built-in rules apply when `None`.
    pub default_rules_path: Option<PathBuf>,
    /// Retry policy for knowledge service calls.
    pub retry: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_rules_path: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Read `PORT` and `BYLAW_DEFAULT_RULES` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let default_rules_path = lookup(ENV_DEFAULT_RULES)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Self {
            port,
            default_rules_path,
            retry: RetryPolicy::default(),
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub rules: Arc<RuleResolver<KnowledgeClient>>,
    pub answers: Arc<AnswerResolver<KnowledgeClient>>,
}

impl AppState {
    /// State with default configuration, built-in rules and no knowledge
    /// service. Every request takes the fallback path.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None, RuleSet::builtin())
    }

    /// State with the given configuration, optional knowledge client and
    /// default rule set.
    pub fn with_config(
        config: AppConfig,
        client: Option<KnowledgeClient>,
        defaults: RuleSet,
    ) -> Self {
        let rules = RuleResolver::new(client.clone(), Arc::new(defaults))
            .with_retry_policy(config.retry);
        let answers = AnswerResolver::new(client).with_retry_policy(config.retry);
        Self {
            config,
            rules: Arc::new(rules),
            answers: Arc::new(answers),
        }
    }

    /// Whether a knowledge service is configured.
    pub fn knowledge_configured(&self) -> bool {
        self.rules.is_configured()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
