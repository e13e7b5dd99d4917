//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use gradebook_common::AppError;
use gradebook_db::{TeacherScope, entities::teacher};

/// Authenticated teacher extractor.
#[derive(Debug, Clone)]
pub struct AuthTeacher(pub teacher::Model);

impl AuthTeacher {
    /// Ownership scope of the authenticated teacher.
    #[must_use]
    pub fn scope(&self) -> TeacherScope {
        TeacherScope::new(self.0.id.clone())
    }
}

impl<S> FromRequestParts<S> for AuthTeacher
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<teacher::Model>()
            .cloned()
            .map(AuthTeacher)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated teacher extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthTeacher(pub Option<teacher::Model>);

impl MaybeAuthTeacher {
    /// Ownership scope, if a teacher is signed in.
    #[must_use]
    pub fn scope(&self) -> Option<TeacherScope> {
        self.0.as_ref().map(|t| TeacherScope::new(t.id.clone()))
    }
}

impl<S> FromRequestParts<S> for MaybeAuthTeacher
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<teacher::Model>().cloned()))
    }
}
