//! Subject endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use gradebook_common::AppResult;
use gradebook_core::SubjectInput;
use gradebook_db::entities::subject;
use serde::Serialize;

use crate::{
    extractors::AuthTeacher,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Subject response.
#[derive(Serialize)]
pub struct SubjectResponse {
    pub id: String,
    pub name: String,
    pub teacher_id: String,
    pub created_at: String,
}

impl From<subject::Model> for SubjectResponse {
    fn from(s: subject::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            teacher_id: s.teacher_id,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

async fn list(
    auth: AuthTeacher,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<SubjectResponse>>> {
    let subjects = state.subject_service.list(&auth.scope()).await?;
    Ok(ApiResponse::ok(subjects.into_iter().map(Into::into).collect()))
}

async fn create(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Json(input): Json<SubjectInput>,
) -> AppResult<ApiResponse<SubjectResponse>> {
    let subject = state.subject_service.create(&auth.scope(), input).await?;
    Ok(ApiResponse::created(subject.into()))
}

async fn show(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SubjectResponse>> {
    let subject = state.subject_service.get(&auth.scope(), &id).await?;
    Ok(ApiResponse::ok(subject.into()))
}

async fn update(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SubjectInput>,
) -> AppResult<ApiResponse<SubjectResponse>> {
    let subject = state.subject_service.update(&auth.scope(), &id, input).await?;
    Ok(ApiResponse::ok(subject.into()))
}

async fn delete(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.subject_service.delete(&auth.scope(), &id).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(delete))
}
