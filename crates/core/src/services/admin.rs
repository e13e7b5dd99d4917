//! Admin service.
//!
//! Administrators see every row of the registered models regardless of owner.
//! These are the only unscoped reads in the application.

use gradebook_common::{AppError, AppResult};
use gradebook_db::{
    entities::{activity, grade, student, subject, teacher},
    repositories::{ActivityRepository, GradeRepository, StudentRepository, SubjectRepository},
};

use crate::admin::{AdminModel, AdminRegistry};

/// All rows of one model.
#[derive(Debug, Clone)]
pub enum AdminRows {
    Subjects(Vec<subject::Model>),
    Students(Vec<student::Model>),
    Activities(Vec<activity::Model>),
    Grades(Vec<grade::Model>),
}

impl AdminRows {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Subjects(rows) => rows.len(),
            Self::Students(rows) => rows.len(),
            Self::Activities(rows) => rows.len(),
            Self::Grades(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Service for the admin endpoints.
#[derive(Clone)]
pub struct AdminService {
    registry: AdminRegistry,
    subject_repo: SubjectRepository,
    student_repo: StudentRepository,
    activity_repo: ActivityRepository,
    grade_repo: GradeRepository,
}

impl AdminService {
    /// Create a new admin service over the given registry.
    #[must_use]
    pub const fn new(
        registry: AdminRegistry,
        subject_repo: SubjectRepository,
        student_repo: StudentRepository,
        activity_repo: ActivityRepository,
        grade_repo: GradeRepository,
    ) -> Self {
        Self {
            registry,
            subject_repo,
            student_repo,
            activity_repo,
            grade_repo,
        }
    }

    /// Fail unless the teacher is an administrator.
    pub fn ensure_admin(teacher: &teacher::Model) -> AppResult<()> {
        if teacher.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    /// Registered models.
    pub fn models(&self, teacher: &teacher::Model) -> AppResult<&[AdminModel]> {
        Self::ensure_admin(teacher)?;
        Ok(self.registry.models())
    }

    /// List every row of a registered model.
    pub async fn list_rows(&self, teacher: &teacher::Model, model: &str) -> AppResult<AdminRows> {
        let model = self.resolve(teacher, model)?;

        let rows = match model {
            AdminModel::Subject => AdminRows::Subjects(self.subject_repo.find_all().await?),
            AdminModel::Student => AdminRows::Students(self.student_repo.find_all().await?),
            AdminModel::Activity => AdminRows::Activities(self.activity_repo.find_all().await?),
            AdminModel::Grade => AdminRows::Grades(self.grade_repo.find_all().await?),
        };

        Ok(rows)
    }

    /// Delete a row of a registered model by ID.
    pub async fn delete_row(&self, teacher: &teacher::Model, model: &str, id: &str) -> AppResult<()> {
        let model = self.resolve(teacher, model)?;

        let deleted = match model {
            AdminModel::Subject => self.subject_repo.delete(id).await?,
            AdminModel::Student => self.student_repo.delete(id).await?,
            AdminModel::Activity => self.activity_repo.delete(id).await?,
            AdminModel::Grade => self.grade_repo.delete(id).await?,
        };

        if !deleted {
            return Err(AppError::NotFound(format!("{} {id}", model.name())));
        }

        tracing::info!(admin_id = %teacher.id, model = model.name(), row_id = %id, "Admin deleted row");
        Ok(())
    }

    fn resolve(&self, teacher: &teacher::Model, model: &str) -> AppResult<AdminModel> {
        Self::ensure_admin(teacher)?;
        self.registry
            .get(model)
            .ok_or_else(|| AppError::NotFound(format!("Admin model '{model}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn teacher(is_admin: bool) -> teacher::Model {
        teacher::Model {
            id: "t1".to_string(),
            username: "root".to_string(),
            username_lower: "root".to_string(),
            email: "root@example.com".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
            token: None,
            is_admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(registry: AdminRegistry, db: MockDatabase) -> AdminService {
        let db = Arc::new(db.into_connection());
        AdminService::new(
            registry,
            SubjectRepository::new(db.clone()),
            StudentRepository::new(db.clone()),
            ActivityRepository::new(db.clone()),
            GradeRepository::new(db),
        )
    }

    #[test]
    fn test_non_admin_is_forbidden() {
        let service = service_with(
            AdminRegistry::with_all_models(),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let result = service.models(&teacher(false));

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_list_rows_of_every_owner() {
        let subjects = vec![
            subject::Model {
                id: "s1".to_string(),
                name: "Math".to_string(),
                teacher_id: "t1".to_string(),
                created_at: Utc::now().into(),
            },
            subject::Model {
                id: "s2".to_string(),
                name: "History".to_string(),
                teacher_id: "t2".to_string(),
                created_at: Utc::now().into(),
            },
        ];
        let service = service_with(
            AdminRegistry::with_all_models(),
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([subjects]),
        );

        let rows = service.list_rows(&teacher(true), "subjects").await.unwrap();

        assert_eq!(rows.len(), 2);
        assert!(matches!(rows, AdminRows::Subjects(_)));
    }

    #[tokio::test]
    async fn test_unregistered_model_is_not_found() {
        let service = service_with(
            AdminRegistry::new().register(AdminModel::Subject),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let result = service.list_rows(&teacher(true), "grades").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let service = service_with(
            AdminRegistry::with_all_models(),
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }]),
        );

        let result = service.delete_row(&teacher(true), "grades", "g404").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_row() {
        let service = service_with(
            AdminRegistry::with_all_models(),
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
        );

        assert!(service.delete_row(&teacher(true), "students", "st1").await.is_ok());
    }
}
