//! Form endpoints.

use std::collections::BTreeMap;

use axum::{
    Router,
    Json,
    extract::{Path, Query, State},
    routing::get,
};
use gradebook_common::AppResult;
use gradebook_core::forms::RenderedForm;
use serde_json::Value;

use crate::{extractors::MaybeAuthTeacher, middleware::AppState, response::ApiResponse};

/// Render a form. Query parameters prefill matching fields.
async fn show(
    auth: MaybeAuthTeacher,
    State(state): State<AppState>,
    Path(form): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> AppResult<ApiResponse<RenderedForm>> {
    let values = params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();

    let scope = auth.scope();
    let rendered = state
        .form_service
        .render(scope.as_ref(), &form, &values)
        .await?;

    Ok(ApiResponse::ok(rendered))
}

/// Check submitted values and return the form with per-field errors.
async fn check(
    auth: MaybeAuthTeacher,
    State(state): State<AppState>,
    Path(form): Path<String>,
    Json(values): Json<BTreeMap<String, Value>>,
) -> AppResult<ApiResponse<RenderedForm>> {
    let scope = auth.scope();
    let rendered = state
        .form_service
        .check(scope.as_ref(), &form, &values)
        .await?;

    Ok(ApiResponse::ok(rendered))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{form}", get(show).post(check))
}
