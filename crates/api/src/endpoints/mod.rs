//! API endpoints.

mod activities;
mod admin;
mod auth;
mod dashboard;
mod forms;
mod grades;
mod students;
mod subjects;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/dashboard", dashboard::router())
        .nest("/subjects", subjects::router())
        .nest("/students", students::router())
        .nest("/activities", activities::router())
        .nest("/grades", grades::router())
        .nest("/forms", forms::router())
        .nest("/admin", admin::router())
}
