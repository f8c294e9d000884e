//! # Error Responses
//!
//! A request fails for one of two reasons: the caller sent something we
//! cannot check (a non-object body, missing project fields, a blank
//! question) or a defect inside the server. Knowledge service trouble is
//! never one of them; the resolvers degrade to defaults and canned answers.
//!
//! Every failure is rendered as
//!
//! ```json
//! {"error": {"code": "BAD_REQUEST", "message": "missing required fields: location"}}
//! ```
//!
//! with the message of an internal defect replaced by a fixed string and the
//! original written to the log instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bylaw_core::BylawError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned in place of any internal error detail.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Envelope for a failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// What went wrong, for the UI.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// `BAD_REQUEST` or `INTERNAL_ERROR`.
    pub code: String,
    /// Shown to the user as-is.
    pub message: String,
}

/// Why a compliance check or bylaw question could not be served.
#[derive(Error, Debug)]
pub enum AppError {
    /// The project row or question cannot be processed as sent (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A server-side defect such as a panicked resolution task (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message the caller sees.
    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(reason) => reason.clone(),
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "request failed on an internal error");
                INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.public_message(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Invalid records and blank questions are the caller's to fix; anything
/// else from the core crate is ours.
impl From<BylawError> for AppError {
    fn from(err: BylawError) -> Self {
        match err {
            BylawError::InvalidInput(reason) => Self::BadRequest(reason),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_fields_render_as_bad_request() {
        let err = AppError::from(BylawError::InvalidInput(
            "missing required fields: location".into(),
        ));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "BAD_REQUEST");
        assert_eq!(body.error.message, "missing required fields: location");
    }

    #[tokio::test]
    async fn failed_resolution_task_hides_its_detail() {
        let (status, body) = render(AppError::Internal("rule task panicked".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, INTERNAL_MESSAGE);
    }

    #[test]
    fn unreadable_rules_file_is_internal() {
        let err = AppError::from(BylawError::RulesLoad {
            path: "/etc/bylaw/rules.json".into(),
            reason: "permission denied".into(),
        });
        assert!(matches!(err, AppError::Internal(ref d) if d.contains("/etc/bylaw/rules.json")));
    }
}
