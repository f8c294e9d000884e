//! # Compliance Check API
//!
//! Accepts one project as a raw row (any supported column aliases) or an
//! already-normalized record, resolves the applicable rules and returns the
//! compliance report. Rule lookup failures are not errors: the report is
//! built against the default rules and the `x-rule-source` header says so.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use bylaw_core::{evaluate, normalize, raw_row_from_json};
use serde_json::Value;

use crate::error::AppError;
use crate::extractors::extract_object;
use crate::state::AppState;

/// Response header naming where the rules came from.
pub const RULE_SOURCE_HEADER: &str = "x-rule-source";

/// Build the compliance router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkCompliance", post(check_compliance))
}

/// POST /api/checkCompliance -- Evaluate a project against resolved rules.
async fn check_compliance(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let row = raw_row_from_json(&extract_object(body)?);
    let record = normalize(&row);
    record.validate()?;

    // Resolution runs on its own task so a dropped request cannot cancel
    // an in-flight knowledge service call.
    let resolver = Arc::clone(&state.rules);
    let task_record = record.clone();
    let resolved = tokio::spawn(async move { resolver.resolve(&task_record).await })
        .await
        .map_err(|e| AppError::Internal(format!("rule resolution task failed: {e}")))?;

    let report = evaluate(&record, &resolved.rules);
    let summary = report.summary();
    tracing::info!(
        project = %report.project_name(),
        rule_source = %resolved.source,
        compliant = summary.compliant,
        violations = summary.violations,
        "compliance check complete"
    );

    Ok(([(RULE_SOURCE_HEADER, resolved.source.as_str())], Json(report)))
}
