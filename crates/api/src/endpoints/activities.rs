//! Activity endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use gradebook_common::AppResult;
use gradebook_core::ActivityInput;
use gradebook_db::entities::activity;
use serde::Serialize;

use crate::{
    extractors::AuthTeacher,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Activity response.
#[derive(Serialize)]
pub struct ActivityResponse {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    pub category: &'static str,
    pub category_label: &'static str,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub created_at: String,
}

impl From<activity::Model> for ActivityResponse {
    fn from(a: activity::Model) -> Self {
        Self {
            id: a.id,
            subject_id: a.subject_id,
            name: a.name,
            category: a.category.as_str(),
            category_label: a.category.label(),
            date: a.date.format("%Y-%m-%d").to_string(),
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

async fn list(
    auth: AuthTeacher,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ActivityResponse>>> {
    let activities = state.activity_service.list(&auth.scope()).await?;
    Ok(ApiResponse::ok(activities.into_iter().map(Into::into).collect()))
}

async fn create(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Json(input): Json<ActivityInput>,
) -> AppResult<ApiResponse<ActivityResponse>> {
    let activity = state.activity_service.create(&auth.scope(), input).await?;
    Ok(ApiResponse::created(activity.into()))
}

async fn show(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ActivityResponse>> {
    let activity = state.activity_service.get(&auth.scope(), &id).await?;
    Ok(ApiResponse::ok(activity.into()))
}

async fn update(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ActivityInput>,
) -> AppResult<ApiResponse<ActivityResponse>> {
    let activity = state
        .activity_service
        .update(&auth.scope(), &id, input)
        .await?;
    Ok(ApiResponse::ok(activity.into()))
}

async fn delete(
    auth: AuthTeacher,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.activity_service.delete(&auth.scope(), &id).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(delete))
}
