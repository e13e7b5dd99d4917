//! Student endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use gradebook_common::AppResult;
use gradebook_core::{StudentDetail, StudentInput};
use gradebook_db::{entities::student, repositories::StudentRemoval};
use serde::Serialize;

use crate::{extractors::AuthTeacher, middleware::AppState, response::ApiResponse};

/// Student response.
#[derive(Serialize)]
pub struct StudentResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Only the requesting teacher's subjects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_ids: Option<Vec<String>>,
    pub created_at: String,
}

impl From<student::Model> for StudentResponse {
    fn from(s: student::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            subject_ids: None,
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

impl From<StudentDetail> for StudentResponse {
    fn from(d: StudentDetail) -> Self {
        Self {
            subject_ids: Some(d.subject_ids),
            ..Self::from(d.student)
        }
    }
}

/// Result of deleting a student.
#[derive(Serialize)]
pub struct RemovalResponse {
    /// `deleted` when the student row is gone, `unenrolled` when other
    /// teachers still have the student.
    pub result: &'static str,
}

impl From<StudentRemoval> for RemovalResponse {
    fn from(r: StudentRemoval) -> Self {
        let result = match r {
            StudentRemoval::Unenrolled => "unenrolled",
            StudentRemoval::Deleted => "deleted",
        };
        Self { result }
    }
}

async fn list(
    auth: AuthTeacher,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<StudentResponse>>> {
    let students = state.student_service.list(&auth.scope()).await?;
    Ok(ApiResponse::ok(students.into_iter().map(Into::into).collect()))
}

async fn create(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Json(input): Json<StudentInput>,
) -> AppResult<ApiResponse<StudentResponse>> {
    let student = state.student_service.create(&auth.scope(), input).await?;
    Ok(ApiResponse::created(student.into()))
}

async fn show(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<StudentResponse>> {
    let student = state.student_service.get(&auth.scope(), &id).await?;
    Ok(ApiResponse::ok(student.into()))
}

async fn update(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<StudentInput>,
) -> AppResult<ApiResponse<StudentResponse>> {
    let student = state.student_service.update(&auth.scope(), &id, input).await?;
    Ok(ApiResponse::ok(student.into()))
}

async fn delete(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RemovalResponse>> {
    let removal = state.student_service.delete(&auth.scope(), &id).await?;
    Ok(ApiResponse::ok(removal.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(delete))
}
