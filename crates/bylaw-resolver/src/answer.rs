//! # Bylaw Q&A
//!
//! Answers a free-text question against the bylaw document. A blank
//! question is the only error. Every service failure degrades, in order, to
//! a canned answer matched from [`crate::canned::CANNED_ANSWERS`] and then
//! to [`crate::canned::GENERIC_APOLOGY`].
//!
//! The service is asked for `{"answer", "clause", "page"}` but prose under an
//! alternate key (`{"text": "..."}`) is also accepted as the answer text,
//! uncited. A bare string with no JSON in it is a failed attempt.

use std::fmt;

use bylaw_core::{BylawAnswer, BylawError, ProjectRecord};
use bylaw_knowledge::{
    with_retry, KnowledgeError, KnowledgeService, Payload, ReplyShape, RetryPolicy,
};
use serde::Serialize;
use serde_json::Value;

use crate::canned::{CannedAnswer, GENERIC_APOLOGY};
use crate::prompt;

/// Key whose presence marks a reply object as an answer.
const ANSWER_KEY: &str = "answer";

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// The knowledge service.
    Knowledge,
    /// The canned answer table.
    Canned,
    /// The generic apology.
    Generic,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Knowledge => "knowledge",
            Self::Canned => "canned",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An answer together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnswer {
    pub answer: BylawAnswer,
    pub source: AnswerSource,
}

impl ResolvedAnswer {
    /// The canned answer for `question`, or the generic apology.
    pub fn fallback(question: &str) -> Self {
        match CannedAnswer::lookup(question) {
            Some(entry) => Self {
                answer: entry.to_answer(),
                source: AnswerSource::Canned,
            },
            None => Self {
                answer: BylawAnswer::uncited(GENERIC_APOLOGY),
                source: AnswerSource::Generic,
            },
        }
    }
}

/// Answers bylaw questions.
#[derive(Debug)]
pub struct AnswerResolver<K> {
    service: Option<K>,
    retry: RetryPolicy,
}

impl<K: KnowledgeService> AnswerResolver<K> {
    /// Create a resolver. `service` is `None` when the knowledge service is
    /// not configured.
    pub fn new(service: Option<K>) -> Self {
        Self {
            service,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Answer `question`, optionally in the context of a project.
    ///
    /// # Errors
    ///
    /// [`BylawError::InvalidInput`] if the question is blank. No call is
    /// made in that case. Service failures are never returned.
    pub async fn answer(
        &self,
        question: &str,
        context: Option<&ProjectRecord>,
    ) -> Result<ResolvedAnswer, BylawError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(BylawError::InvalidInput("question is required".into()));
        }

        let Some(service) = self.service.as_ref() else {
            tracing::debug!("knowledge service not configured, using fallback answer");
            return Ok(ResolvedAnswer::fallback(question));
        };

        let query = prompt::answer_query(service.document_id(), question, context);
        let query = query.as_str();
        let result = with_retry(self.retry, "answer_question", || async move {
            parse_answer(service.query(query).await?)
        })
        .await;

        let resolved = match result {
            Ok(answer) => ResolvedAnswer {
                answer,
                source: AnswerSource::Knowledge,
            },
            Err(e) => {
                let resolved = ResolvedAnswer::fallback(question);
                tracing::warn!(
                    source = %resolved.source,
                    attempts = self.retry.attempts(),
                    error = %e,
                    "bylaw question failed, using fallback answer"
                );
                resolved
            }
        };
        tracing::info!(source = %resolved.source, "bylaw question answered");
        Ok(resolved)
    }
}

/// Pull an answer out of a raw knowledge service reply.
///
/// # Errors
///
/// [`KnowledgeError::MalformedReply`] when the reply has no answer text.
pub fn parse_answer(reply: Value) -> Result<BylawAnswer, KnowledgeError> {
    let shape = ReplyShape::classify(reply, ANSWER_KEY);
    let kind = shape.kind();
    let answer = match shape.into_payload() {
        Some(Payload::Object(object)) => serde_json::from_value::<BylawAnswer>(Value::Object(object))
            .map_err(|e| KnowledgeError::MalformedReply(format!("{kind} reply: {e}")))?,
        Some(Payload::Prose(text)) => BylawAnswer::uncited(text),
        None => {
            return Err(KnowledgeError::MalformedReply(format!(
                "{kind} reply has no answer"
            )))
        }
    };
    if answer.is_blank() {
        return Err(KnowledgeError::MalformedReply(format!("{kind} reply has an empty answer")));
    }
    Ok(BylawAnswer {
        answer: answer.answer.trim().to_string(),
        ..answer
    })
}
