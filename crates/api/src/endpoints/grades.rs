//! Grade endpoints.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch},
};
use gradebook_common::AppResult;
use gradebook_core::{CreateGradeInput, GradeSheet, UpdateGradeInput};
use gradebook_db::entities::grade;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{activities::ActivityResponse, students::StudentResponse};
use crate::{
    extractors::AuthTeacher,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Grade response. The value is a string with two decimals so clients
/// never see a float.
#[derive(Serialize)]
pub struct GradeResponse {
    pub id: String,
    pub student_id: String,
    pub activity_id: String,
    pub value: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<grade::Model> for GradeResponse {
    fn from(g: grade::Model) -> Self {
        Self {
            id: g.id,
            student_id: g.student_id,
            activity_id: g.activity_id,
            value: format_value(g.value),
            created_at: g.created_at.to_rfc3339(),
            updated_at: g.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

fn format_value(value: Decimal) -> String {
    format!("{value:.2}")
}

/// Grade sheet response.
#[derive(Serialize)]
pub struct GradeSheetResponse {
    pub grades: Vec<GradeResponse>,
    pub students: Vec<StudentResponse>,
    pub activities: Vec<ActivityResponse>,
    pub activity_subjects: BTreeMap<String, String>,
    pub student_subjects: BTreeMap<String, Vec<String>>,
}

impl From<GradeSheet> for GradeSheetResponse {
    fn from(sheet: GradeSheet) -> Self {
        Self {
            grades: sheet.grades.into_iter().map(Into::into).collect(),
            students: sheet.students.into_iter().map(Into::into).collect(),
            activities: sheet.activities.into_iter().map(Into::into).collect(),
            activity_subjects: sheet.activity_subjects,
            student_subjects: sheet.student_subjects,
        }
    }
}

async fn sheet(
    auth: AuthTeacher,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<GradeSheetResponse>> {
    let sheet = state.grade_service.sheet(&auth.scope()).await?;
    Ok(ApiResponse::ok(sheet.into()))
}

async fn create(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Json(input): Json<CreateGradeInput>,
) -> AppResult<ApiResponse<GradeResponse>> {
    let grade = state.grade_service.create(&auth.scope(), input).await?;
    Ok(ApiResponse::created(grade.into()))
}

async fn update(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateGradeInput>,
) -> AppResult<ApiResponse<GradeResponse>> {
    let grade = state.grade_service.update(&auth.scope(), &id, input).await?;
    Ok(ApiResponse::ok(grade.into()))
}

async fn delete(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.grade_service.delete(&auth.scope(), &id).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sheet).post(create))
        .route("/{id}", patch(update).delete(delete))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_value_keeps_two_decimals() {
        assert_eq!(format_value(Decimal::from_str("8.5").unwrap()), "8.50");
        assert_eq!(format_value(Decimal::from_str("10.00").unwrap()), "10.00");
        assert_eq!(format_value(Decimal::ZERO), "0.00");
    }
}
