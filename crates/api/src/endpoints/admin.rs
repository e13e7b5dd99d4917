//! Admin endpoints.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get},
};
use gradebook_common::AppResult;
use gradebook_core::{AdminRows, forms::FormSpec};
use serde::Serialize;

use super::{
    activities::ActivityResponse, grades::GradeResponse, students::StudentResponse,
    subjects::SubjectResponse,
};
use crate::{
    extractors::AuthTeacher,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Registered model response.
#[derive(Serialize)]
pub struct ModelResponse {
    pub name: &'static str,
    pub label: &'static str,
    pub form: FormSpec,
}

/// Every row of one model.
#[derive(Serialize)]
#[serde(untagged)]
pub enum RowsResponse {
    Subjects(Vec<SubjectResponse>),
    Students(Vec<StudentResponse>),
    Activities(Vec<ActivityResponse>),
    Grades(Vec<GradeResponse>),
}

impl From<AdminRows> for RowsResponse {
    fn from(rows: AdminRows) -> Self {
        match rows {
            AdminRows::Subjects(r) => Self::Subjects(r.into_iter().map(Into::into).collect()),
            AdminRows::Students(r) => Self::Students(r.into_iter().map(Into::into).collect()),
            AdminRows::Activities(r) => Self::Activities(r.into_iter().map(Into::into).collect()),
            AdminRows::Grades(r) => Self::Grades(r.into_iter().map(Into::into).collect()),
        }
    }
}

async fn models(
    AuthTeacher(teacher): AuthTeacher,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ModelResponse>>> {
    let models = state
        .admin_service
        .models(&teacher)?
        .iter()
        .map(|m| ModelResponse {
            name: m.name(),
            label: m.label(),
            form: m.form(),
        })
        .collect();

    Ok(ApiResponse::ok(models))
}

async fn rows(
    AuthTeacher(teacher): AuthTeacher,
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> AppResult<ApiResponse<RowsResponse>> {
    let rows = state.admin_service.list_rows(&teacher, &model).await?;
    Ok(ApiResponse::ok(rows.into()))
}

async fn delete_row(
    AuthTeacher(teacher): AuthTeacher,
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    state.admin_service.delete_row(&teacher, &model, &id).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/models", get(models))
        .route("/{model}", get(rows))
        .route("/{model}/{id}", delete(delete_row))
}
