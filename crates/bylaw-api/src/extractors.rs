//! # Request Extraction
//!
//! Handlers take `Result<Json<T>, JsonRejection>` so that a malformed body
//! becomes a structured [`AppError::BadRequest`] instead of axum's plain-text
//! rejection.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body that must be an object.
pub fn extract_object(
    result: Result<Json<Value>, JsonRejection>,
) -> Result<Map<String, Value>, AppError> {
    match extract_json(result)? {
        Value::Object(object) => Ok(object),
        other => Err(AppError::BadRequest(format!(
            "request body must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
