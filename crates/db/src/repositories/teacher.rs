//! Teacher repository.

use std::sync::Arc;

use chrono::Utc;
use gradebook_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::{db_error, is_unique_violation};
use crate::entities::{Teacher, teacher};

/// Teacher repository for database operations.
#[derive(Clone)]
pub struct TeacherRepository {
    db: Arc<DatabaseConnection>,
}

impl TeacherRepository {
    /// Create a new teacher repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a teacher by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<teacher::Model>> {
        Teacher::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a teacher by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<teacher::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Teacher not found: {id}")))
    }

    /// Find a teacher by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<teacher::Model>> {
        Teacher::find()
            .filter(teacher::Column::UsernameLower.eq(username.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a teacher by session token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<teacher::Model>> {
        Teacher::find()
            .filter(teacher::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new teacher.
    ///
    /// A concurrent signup with the same username surfaces as a conflict.
    pub async fn create(&self, model: teacher::ActiveModel) -> AppResult<teacher::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Username already taken".to_string())
            } else {
                db_error(e)
            }
        })
    }

    /// Replace a teacher's session token.
    pub async fn set_token(&self, id: &str, token: Option<String>) -> AppResult<teacher::Model> {
        let teacher = self.get_by_id(id).await?;

        let mut active: teacher::ActiveModel = teacher.into();
        active.token = Set(token);
        active.updated_at = Set(Some(Utc::now().into()));

        active.update(self.db.as_ref()).await.map_err(db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_teacher(id: &str, username: &str) -> teacher::Model {
        teacher::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            email: format!("{}@school.test", username.to_lowercase()),
            first_name: "Test".to_string(),
            last_name: "Teacher".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            token: Some("token123".to_string()),
            is_admin: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let teacher = create_test_teacher("t1", "Ana");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[teacher.clone()]])
                .into_connection(),
        );

        let repo = TeacherRepository::new(db);
        let result = repo.find_by_username("ANA").await.unwrap();

        assert_eq!(result.unwrap().id, "t1");
    }

    #[tokio::test]
    async fn test_find_by_token_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<teacher::Model>::new()])
                .into_connection(),
        );

        let repo = TeacherRepository::new(db);
        let result = repo.find_by_token("nope").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<teacher::Model>::new()])
                .into_connection(),
        );

        let repo = TeacherRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_token() {
        let teacher = create_test_teacher("t1", "ana");
        let mut rotated = teacher.clone();
        rotated.token = Some("fresh".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[teacher]])
                .append_query_results([[rotated]])
                .into_connection(),
        );

        let repo = TeacherRepository::new(db);
        let result = repo.set_token("t1", Some("fresh".to_string())).await.unwrap();

        assert_eq!(result.token.as_deref(), Some("fresh"));
    }
}
