//! # Bylaw Q&A API
//!
//! `POST /api/askBylaw` with `{"question": "...", "context": {...}}`. The
//! optional context is a project in the same shapes `checkCompliance`
//! accepts and is normalized before it is handed to the resolver.
//!
//! Only a missing or blank question is an error. The `x-answer-source`
//! header reports whether the answer came from the knowledge service, the
//! canned table or the generic apology.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use bylaw_core::{normalize, raw_row_from_json, ProjectRecord};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::extractors::{extract_json, json_kind};
use crate::state::AppState;

/// Response header naming where the answer came from.
pub const ANSWER_SOURCE_HEADER: &str = "x-answer-source";

/// Ask-bylaw request.
#[derive(Debug, Deserialize)]
pub struct AskBylawRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub context: Option<Value>,
}

impl AskBylawRequest {
    /// The context as a normalized record, if one was sent.
    fn context_record(&self) -> Result<Option<ProjectRecord>, AppError> {
        match &self.context {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(object)) => Ok(Some(normalize(&raw_row_from_json(object)))),
            Some(other) => Err(AppError::BadRequest(format!(
                "context must be a JSON object, got {}",
                json_kind(other)
            ))),
        }
    }
}

/// Build the bylaw Q&A router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/askBylaw", post(ask_bylaw))
}

/// POST /api/askBylaw -- Answer a bylaw question.
async fn ask_bylaw(
    State(state): State<AppState>,
    body: Result<Json<AskBylawRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = extract_json(body)?;
    let context = req.context_record()?;

    let resolver = Arc::clone(&state.answers);
    let question = req.question;
    // A blank question comes back as InvalidInput before any call is made.
    let resolved = tokio::spawn(async move { resolver.answer(&question, context.as_ref()).await })
        .await
        .map_err(|e| AppError::Internal(format!("answer task failed: {e}")))??;

    Ok((
        [(ANSWER_SOURCE_HEADER, resolved.source.as_str())],
        Json(resolved.answer),
    ))
}
