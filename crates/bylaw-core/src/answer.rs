//! # Bylaw Answers
//!
//! A short, cited answer to a free-text bylaw question. The serialized shape
//! is what the knowledge service is asked to reply with and what the API
//! returns:
//!
//! ```json
//! {"answer": "...", "clause": "BBMP 2019, Clause 6.3.2", "page": "45"}
//! ```
//!
//! `clause` and `page` may arrive as numbers; both are carried as strings.
//! `page` is omitted from output when unknown.

use serde::{Deserialize, Serialize};

use crate::rules::lenient;

/// An answer to a bylaw question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BylawAnswer {
    /// Answer text. Never empty once accepted.
    pub answer: String,
    /// Citation backing the answer, if any.
    #[serde(default, deserialize_with = "lenient::text")]
    pub clause: Option<String>,
    /// Page of the cited document, if known.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub page: Option<String>,
}

impl BylawAnswer {
    /// An answer with no citation.
    pub fn uncited(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            clause: None,
            page: None,
        }
    }

    /// Whether the answer text is blank.
    pub fn is_blank(&self) -> bool {
        self.answer.trim().is_empty()
    }
}
