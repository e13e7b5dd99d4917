//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use gradebook_common::AppResult;
use gradebook_core::{Session, SigninInput, SignupInput};
use gradebook_db::entities::teacher;
use serde::Serialize;

use crate::{
    extractors::AuthTeacher,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Teacher account response. Never carries the password hash or token.
#[derive(Serialize)]
pub struct TeacherResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<teacher::Model> for TeacherResponse {
    fn from(t: teacher::Model) -> Self {
        Self {
            id: t.id,
            username: t.username,
            email: t.email,
            first_name: t.first_name,
            last_name: t.last_name,
            is_admin: t.is_admin,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Session response.
#[derive(Serialize)]
pub struct SessionResponse {
    pub teacher: TeacherResponse,
    pub token: String,
}

impl From<Session> for SessionResponse {
    fn from(s: Session) -> Self {
        Self {
            teacher: s.teacher.into(),
            token: s.token,
        }
    }
}

/// Register a teacher account.
async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let session = state.teacher_service.signup(input).await?;
    Ok(ApiResponse::created(session.into()))
}

/// Sign in with username and password.
async fn signin(
    State(state): State<AppState>,
    Json(input): Json<SigninInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let session = state.teacher_service.signin(input).await?;
    Ok(ApiResponse::ok(session.into()))
}

/// Sign out (invalidate current token by rotating it).
async fn signout(
    AuthTeacher(teacher): AuthTeacher,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    state.teacher_service.signout(&teacher.id).await?;
    Ok(response::ok())
}

/// The signed-in teacher.
async fn me(AuthTeacher(teacher): AuthTeacher) -> ApiResponse<TeacherResponse> {
    ApiResponse::ok(teacher.into())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/signout", post(signout))
        .route("/me", get(me))
}
