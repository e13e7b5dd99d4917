//! HTTP API layer for gradebook.
//!
//! - **Endpoints**: JSON routes for accounts, subjects, students, activities,
//!   grades, forms and administration
//! - **Extractors**: the authenticated teacher and their ownership scope
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;

use axum::{Json, Router, middleware::from_fn_with_state, routing::get};
use serde_json::{Value, json};

use crate::middleware::{AppState, auth_middleware};

/// The API under `/api` plus `/health`, with authentication applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", router())
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// Liveness check.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
