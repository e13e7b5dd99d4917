//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use gradebook_core::{
    ActivityService, AdminRegistry, AdminService, DashboardService, FormService, GradeService,
    StudentService, SubjectService, TeacherService,
};
use gradebook_db::repositories::{
    ActivityRepository, GradeRepository, StudentRepository, SubjectRepository, TeacherRepository,
};
use sea_orm::DatabaseConnection;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub teacher_service: TeacherService,
    pub dashboard_service: DashboardService,
    pub subject_service: SubjectService,
    pub student_service: StudentService,
    pub activity_service: ActivityService,
    pub grade_service: GradeService,
    pub form_service: FormService,
    pub admin_service: AdminService,
}

impl AppState {
    /// Wire every service to one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, registry: AdminRegistry) -> Self {
        let teacher_repo = TeacherRepository::new(Arc::clone(&db));
        let subject_repo = SubjectRepository::new(Arc::clone(&db));
        let student_repo = StudentRepository::new(Arc::clone(&db));
        let activity_repo = ActivityRepository::new(Arc::clone(&db));
        let grade_repo = GradeRepository::new(db);

        Self {
            teacher_service: TeacherService::new(teacher_repo),
            dashboard_service: DashboardService::new(subject_repo.clone(), student_repo.clone()),
            subject_service: SubjectService::new(subject_repo.clone()),
            student_service: StudentService::new(student_repo.clone(), subject_repo.clone()),
            activity_service: ActivityService::new(activity_repo.clone(), subject_repo.clone()),
            grade_service: GradeService::new(
                grade_repo.clone(),
                student_repo.clone(),
                activity_repo.clone(),
            ),
            form_service: FormService::new(
                subject_repo.clone(),
                student_repo.clone(),
                activity_repo.clone(),
            ),
            admin_service: AdminService::new(
                registry,
                subject_repo,
                student_repo,
                activity_repo,
                grade_repo,
            ),
        }
    }
}

/// Authentication middleware.
///
/// Attaches the teacher owning the bearer token to the request. Requests
/// without a valid token pass through unauthenticated; handlers that need a
/// teacher reject them through `AuthTeacher`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.teacher_service.authenticate_by_token(token.trim()).await {
            Ok(teacher) => {
                req.extensions_mut().insert(teacher);
            }
            Err(e) if e.is_server_error() => {
                tracing::warn!(error = %e, "Token lookup failed");
            }
            Err(_) => {}
        }
    }

    next.run(req).await
}
