//! # bylaw-resolver -- Rules and Answers with Graceful Degradation
//!
//! Two resolvers sit between the API and the knowledge service:
//!
//! - [`RuleResolver`] turns a project record into a [`bylaw_core::RuleSet`],
//!   falling back to the configured defaults.
//! - [`AnswerResolver`] answers a free-text question, falling back to a
//!   canned table and then a generic apology.
//!
//! Both make at most two calls (one retry after a fixed backoff) and never
//! surface a service failure to the caller. Each result carries its source
//! so callers can tell a live answer from a fallback.
//!
//! Resolvers are generic over [`bylaw_knowledge::KnowledgeService`]. When no
//! service is configured they go straight to the fallback without a call.

pub mod answer;
pub mod canned;
pub mod prompt;
pub mod rules;

pub use answer::{AnswerResolver, AnswerSource, ResolvedAnswer};
pub use canned::{CannedAnswer, CANNED_ANSWERS, GENERIC_APOLOGY};
pub use rules::{ResolvedRules, RuleResolver, RuleSource};
