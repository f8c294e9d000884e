//! # Rule Resolution
//!
//! Looks up the limits that apply to a project from the knowledge service,
//! and falls back to the configured defaults when that is not possible.
//!
//! ## Failure Handling
//!
//! | Condition                       | Result                        |
//! |---------------------------------|-------------------------------|
//! | No service configured           | defaults, no call             |
//! | Transport error / timeout       | retry once, then defaults     |
//! | Non-2xx status                  | retry once, then defaults     |
//! | Reply missing any numeric limit | retry once, then defaults     |
//!
//! [`RuleResolver::resolve`] never returns an error.

use std::fmt;
use std::sync::Arc;

use bylaw_core::{ProjectRecord, RuleSet};
use bylaw_knowledge::{with_retry, KnowledgeError, KnowledgeService, ReplyShape, RetryPolicy};
use serde::Serialize;
use serde_json::Value;

use crate::prompt;

/// Key whose presence marks a reply object as a rule set.
const RULES_KEY: &str = "height_max";

/// Where a resolved rule set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSource {
    /// Parsed from a knowledge service reply.
    External,
    /// The configured defaults.
    Default,
}

impl RuleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule set together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRules {
    pub rules: RuleSet,
    pub source: RuleSource,
}

/// Resolves the rule set for a project.
#[derive(Debug)]
pub struct RuleResolver<K> {
    service: Option<K>,
    defaults: Arc<RuleSet>,
    retry: RetryPolicy,
}

impl<K: KnowledgeService> RuleResolver<K> {
    /// Create a resolver. `service` is `None` when the knowledge service is
    /// not configured.
    pub fn new(service: Option<K>, defaults: Arc<RuleSet>) -> Self {
        Self {
            service,
            defaults,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The rule set used when resolution fails.
    pub fn defaults(&self) -> &RuleSet {
        &self.defaults
    }

    /// Whether a knowledge service is configured.
    pub fn is_configured(&self) -> bool {
        self.service.is_some()
    }

    /// Resolve the rules for `record`. Never fails; see the module docs.
    pub async fn resolve(&self, record: &ProjectRecord) -> ResolvedRules {
        let Some(service) = self.service.as_ref() else {
            tracing::debug!("knowledge service not configured, using default rules");
            return self.fallback();
        };

        let query = prompt::rules_query(service.document_id(), record);
        let query = query.as_str();
        let result = with_retry(self.retry, "resolve_rules", || async move {
            parse_rules(service.query(query).await?)
        })
        .await;

        match result {
            Ok(rules) => {
                tracing::info!(
                    source = %RuleSource::External,
                    building_type = %record.building_type,
                    "rules resolved"
                );
                ResolvedRules {
                    rules,
                    source: RuleSource::External,
                }
            }
            Err(e) => {
                tracing::warn!(
                    source = %RuleSource::Default,
                    attempts = self.retry.attempts(),
                    error = %e,
                    "rule lookup failed, using default rules"
                );
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> ResolvedRules {
        ResolvedRules {
            rules: RuleSet::clone(&self.defaults),
            source: RuleSource::Default,
        }
    }
}

/// Pull a complete rule set out of a raw knowledge service reply.
///
/// # Errors
///
/// [`KnowledgeError::MalformedReply`] when the reply carries no object or
/// the object is missing a numeric limit.
pub fn parse_rules(reply: Value) -> Result<RuleSet, KnowledgeError> {
    let shape = ReplyShape::classify(reply, RULES_KEY);
    let kind = shape.kind();
    let object = shape
        .into_object()
        .ok_or_else(|| KnowledgeError::MalformedReply(format!("{kind} reply has no rule object")))?;
    RuleSet::from_json_value(Value::Object(object))
        .map_err(|e| KnowledgeError::MalformedReply(format!("{kind} reply: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedService;
    use serde_json::json;

    fn reply() -> Value {
        json!({
            "height_max": 15,
            "height_clause": "BBMP 2019, Clause 4.3.3",
            "setback": {"front": 6, "rear": 2.5, "side": 2,
                        "front_clause": "Clause 5.1.1"},
            "parking_min": 10,
            "parking_clause": "Clause 6.2.1",
            "far_max": 1.75,
            "far_clause": "Table 5.4.1"
        })
    }

    fn record() -> ProjectRecord {
        ProjectRecord {
            name: "Green Tower".into(),
            building_type: "residential".into(),
            location: "Koramangala".into(),
            ..ProjectRecord::default()
        }
    }

    fn resolver(service: Option<ScriptedService>) -> RuleResolver<ScriptedService> {
        RuleResolver::new(service, Arc::new(RuleSet::builtin()))
    }

    #[tokio::test(start_paused = true)]
    async fn first_reply_is_used() {
        let resolver = resolver(Some(ScriptedService::new(vec![Ok(reply())])));
        let resolved = resolver.resolve(&record()).await;
        assert_eq!(resolved.source, RuleSource::External);
        assert_eq!(resolved.rules.height_max, 15.0);
        assert_eq!(resolved.rules.setback.rear, 2.5);
        assert_eq!(resolved.rules.setback.rear_clause, None);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_result_wins_over_fallback() {
        let service = ScriptedService::new(vec![Err(ScriptedService::failing()), Ok(reply())]);
        let resolver = resolver(Some(service));
        let resolved = resolver.resolve(&record()).await;
        assert_eq!(resolved.source, RuleSource::External);
        assert_eq!(resolved.rules.far_max, 1.75);
    }

    #[tokio::test(start_paused = true)]
    async fn two_failures_fall_back_to_defaults() {
        let service = ScriptedService::new(vec![
            Err(ScriptedService::failing()),
            Err(ScriptedService::failing()),
            Ok(reply()),
        ]);
        let resolver = resolver(Some(service));
        let resolved = resolver.resolve(&record()).await;
        assert_eq!(resolved.source, RuleSource::Default);
        assert_eq!(resolved.rules, RuleSet::builtin());
        assert_eq!(resolver.service.as_ref().unwrap().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_reply_is_retried() {
        let service = ScriptedService::new(vec![Ok(json!({"height_max": 15})), Ok(reply())]);
        let resolver = resolver(Some(service));
        let resolved = resolver.resolve(&record()).await;
        assert_eq!(resolved.source, RuleSource::External);
        assert_eq!(resolver.service.as_ref().unwrap().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_separates_attempts() {
        let service = ScriptedService::new(vec![Err(ScriptedService::failing()), Ok(reply())]);
        let resolver = resolver(Some(service));
        let started = tokio::time::Instant::now();
        resolver.resolve(&record()).await;
        assert!(started.elapsed() >= std::time::Duration::from_secs(1));
    }

    #[tokio::test]
    async fn unconfigured_resolver_makes_no_call() {
        let resolver = resolver(None);
        assert!(!resolver.is_configured());
        let resolved = resolver.resolve(&record()).await;
        assert_eq!(resolved.source, RuleSource::Default);
        assert_eq!(&resolved.rules, resolver.defaults());
    }

    #[tokio::test(start_paused = true)]
    async fn prompt_names_building_type_and_location() {
        let resolver = resolver(Some(ScriptedService::new(vec![Ok(reply())])));
        resolver.resolve(&record()).await;
        let prompt = resolver.service.as_ref().unwrap().last_prompt().unwrap();
        assert!(prompt.contains("residential building at Koramangala"));
    }

    #[test]
    fn embedded_and_wrapped_replies_parse() {
        let text = format!("Here you go: {} Hope that helps.", reply());
        assert_eq!(parse_rules(json!(text)).unwrap().far_max, 1.75);

        let wrapped = json!({"result": reply().to_string()});
        assert_eq!(parse_rules(wrapped).unwrap().height_max, 15.0);
    }

    #[test]
    fn prose_and_partial_replies_are_malformed() {
        assert!(matches!(
            parse_rules(json!("The height limit is 12 m.")),
            Err(KnowledgeError::MalformedReply(_))
        ));
        let mut partial = reply();
        partial["setback"].as_object_mut().unwrap().remove("side");
        assert!(matches!(parse_rules(partial), Err(KnowledgeError::MalformedReply(_))));
    }

    #[test]
    fn source_labels() {
        assert_eq!(RuleSource::External.to_string(), "external");
        assert_eq!(serde_json::to_value(RuleSource::Default).unwrap(), json!("default"));
    }
}
