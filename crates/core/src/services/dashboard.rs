//! Dashboard service.

use gradebook_common::AppResult;
use gradebook_db::{
    TeacherScope,
    entities::subject,
    repositories::{StudentRepository, SubjectRepository},
};

/// Landing page summary for a teacher.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub subjects: Vec<subject::Model>,
    /// Students enrolled in at least one of the subjects, each counted once.
    pub student_count: u64,
}

/// Service for the teacher dashboard.
#[derive(Clone)]
pub struct DashboardService {
    subject_repo: SubjectRepository,
    student_repo: StudentRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(subject_repo: SubjectRepository, student_repo: StudentRepository) -> Self {
        Self {
            subject_repo,
            student_repo,
        }
    }

    /// Build the dashboard for the teacher.
    pub async fn get(&self, scope: &TeacherScope) -> AppResult<Dashboard> {
        let subjects = self.subject_repo.list(scope).await?;
        let student_count = self.student_repo.count_scoped(scope).await?;

        Ok(Dashboard {
            subjects,
            student_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dashboard() {
        let math = subject::Model {
            id: "s1".to_string(),
            name: "Math".to_string(),
            teacher_id: "t1".to_string(),
            created_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[math]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );
        let service =
            DashboardService::new(SubjectRepository::new(db.clone()), StudentRepository::new(db));

        let dashboard = service.get(&TeacherScope::new("t1")).await.unwrap();

        assert_eq!(dashboard.subjects.len(), 1);
        assert_eq!(dashboard.student_count, 3);
    }
}
