//! Subject repository.

use std::sync::Arc;

use chrono::Utc;
use gradebook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::db_error;
use crate::entities::{Subject, subject};
use crate::scope::TeacherScope;

/// Repository for subject operations.
#[derive(Clone)]
pub struct SubjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SubjectRepository {
    /// Create a new subject repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a subject within the teacher's scope.
    pub async fn find_scoped(
        &self,
        scope: &TeacherScope,
        id: &str,
    ) -> AppResult<Option<subject::Model>> {
        scope
            .subject(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a subject within the teacher's scope, or fail with not-found.
    pub async fn get_scoped(&self, scope: &TeacherScope, id: &str) -> AppResult<subject::Model> {
        self.find_scoped(scope, id)
            .await?
            .ok_or_else(|| AppError::SubjectNotFound(id.to_string()))
    }

    /// List the teacher's subjects by name.
    pub async fn list(&self, scope: &TeacherScope) -> AppResult<Vec<subject::Model>> {
        scope
            .subjects()
            .order_by(subject::Column::Name, Order::Asc)
            .order_by(subject::Column::Id, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Return the subset of `ids` that the teacher owns.
    pub async fn owned_ids(&self, scope: &TeacherScope, ids: &[String]) -> AppResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        scope
            .subjects()
            .filter(subject::Column::Id.is_in(ids.to_vec()))
            .select_only()
            .column(subject::Column::Id)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new subject owned by the scope's teacher.
    pub async fn create(
        &self,
        scope: &TeacherScope,
        id: String,
        name: String,
    ) -> AppResult<subject::Model> {
        let active_model = subject::ActiveModel {
            id: Set(id),
            name: Set(name),
            teacher_id: Set(scope.teacher_id().to_string()),
            created_at: Set(Utc::now().into()),
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Rename a subject previously loaded through the scope.
    pub async fn rename(&self, subject: subject::Model, name: String) -> AppResult<subject::Model> {
        let mut active: subject::ActiveModel = subject.into();
        active.name = Set(name);

        active.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Delete a subject. Activities, their grades and enrollments go with it
    /// through the cascading foreign keys.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Subject::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }

    /// List every subject regardless of owner (admin only).
    pub async fn find_all(&self) -> AppResult<Vec<subject::Model>> {
        Subject::find()
            .order_by(subject::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }
}
