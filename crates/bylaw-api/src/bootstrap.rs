//! # Startup
//!
//! Builds [`AppState`] from configuration:
//!
//! 1. **Load default rules** from `BYLAW_DEFAULT_RULES` if set. A missing or
//!    invalid file is logged and the built-in rules apply.
//! 2. **Wire resolvers** around the knowledge client, if one was built.
//! 3. **Log** which mode the server runs in.

use std::path::Path;

use bylaw_core::RuleSet;
use bylaw_knowledge::KnowledgeClient;

use crate::state::{AppConfig, AppState};

/// Load the default rule set, falling back to the built-in rules.
pub fn load_default_rules(path: Option<&Path>) -> RuleSet {
    let Some(path) = path else {
        return RuleSet::builtin();
    };
    match RuleSet::from_file(path) {
        Ok(rules) => {
            tracing::info!(path = %path.display(), "default rules loaded");
            rules
        }
        Err(e) => {
            tracing::warn!("{e}. Using built-in default rules.");
            RuleSet::builtin()
        }
    }
}

/// Assemble application state.
pub fn bootstrap(config: AppConfig, client: Option<KnowledgeClient>) -> AppState {
    let defaults = load_default_rules(config.default_rules_path.as_deref());
    let state = AppState::with_config(config, client, defaults);

    if state.knowledge_configured() {
        tracing::info!(
            max_retries = state.config.retry.max_retries,
            backoff_ms = state.config.retry.backoff.as_millis() as u64,
            "knowledge service enabled"
        );
    } else {
        tracing::info!("knowledge service disabled, serving default rules and canned answers");
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_path_means_builtin_rules() {
        assert_eq!(load_default_rules(None), RuleSet::builtin());
    }

    #[test]
    fn rules_file_overrides_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"height_max": 18, "setback": {{"front": 5, "rear": 2, "side": 2}},
                "parking_min": 8, "far_max": 2.0}}"#
        )
        .unwrap();
        let rules = load_default_rules(Some(file.path()));
        assert_eq!(rules.height_max, 18.0);
        assert_eq!(rules.far_max, 2.0);
        assert_eq!(rules.height_clause, None);
    }

    #[test]
    fn unreadable_file_falls_back() {
        let rules = load_default_rules(Some(Path::new("/nonexistent/rules.json")));
        assert_eq!(rules, RuleSet::builtin());
    }

    #[test]
    fn incomplete_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"height_max": 18}}"#).unwrap();
        assert_eq!(load_default_rules(Some(file.path())), RuleSet::builtin());
    }

    #[test]
    fn bootstrap_without_client_is_unconfigured() {
        let state = bootstrap(AppConfig::default(), None);
        assert!(!state.knowledge_configured());
    }
}
