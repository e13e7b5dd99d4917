//! Dashboard endpoint.

use axum::{Router, extract::State, routing::get};
use gradebook_common::AppResult;
use serde::Serialize;

use super::subjects::SubjectResponse;
use crate::{extractors::AuthTeacher, middleware::AppState, response::ApiResponse};

/// Dashboard response.
#[derive(Serialize)]
pub struct DashboardResponse {
    pub subjects: Vec<SubjectResponse>,
    pub student_count: u64,
}

/// The teacher's subjects and how many distinct students take them.
async fn show(
    auth: AuthTeacher,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardResponse>> {
    let dashboard = state.dashboard_service.get(&auth.scope()).await?;

    Ok(ApiResponse::ok(DashboardResponse {
        subjects: dashboard.subjects.into_iter().map(Into::into).collect(),
        student_count: dashboard.student_count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show))
}
