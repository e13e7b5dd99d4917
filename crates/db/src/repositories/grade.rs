//! Grade repository.

use std::sync::Arc;

use chrono::Utc;
use gradebook_common::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::{db_error, is_unique_violation};
use crate::entities::{Grade, grade};
use crate::scope::TeacherScope;

/// Repository for grade operations.
#[derive(Clone)]
pub struct GradeRepository {
    db: Arc<DatabaseConnection>,
}

impl GradeRepository {
    /// Create a new grade repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a grade recorded on one of the teacher's activities.
    pub async fn find_scoped(
        &self,
        scope: &TeacherScope,
        id: &str,
    ) -> AppResult<Option<grade::Model>> {
        scope
            .grade(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a grade in scope, or fail with not-found.
    pub async fn get_scoped(&self, scope: &TeacherScope, id: &str) -> AppResult<grade::Model> {
        self.find_scoped(scope, id)
            .await?
            .ok_or_else(|| AppError::GradeNotFound(id.to_string()))
    }

    /// List the teacher's grades, newest first.
    pub async fn list(&self, scope: &TeacherScope) -> AppResult<Vec<grade::Model>> {
        scope
            .grades()
            .order_by(grade::Column::CreatedAt, Order::Desc)
            .order_by(grade::Column::Id, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Check whether a grade already links the student to the activity.
    pub async fn exists_for_pair(&self, student_id: &str, activity_id: &str) -> AppResult<bool> {
        let count = Grade::find()
            .filter(grade::Column::StudentId.eq(student_id))
            .filter(grade::Column::ActivityId.eq(activity_id))
            .count(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(count > 0)
    }

    /// Record a grade.
    ///
    /// Two concurrent inserts for the same pair both pass the application
    /// check; the unique index rejects the second, reported as a duplicate.
    pub async fn create(
        &self,
        id: String,
        student_id: String,
        activity_id: String,
        value: Decimal,
    ) -> AppResult<grade::Model> {
        let active_model = grade::ActiveModel {
            id: Set(id),
            student_id: Set(student_id.clone()),
            activity_id: Set(activity_id.clone()),
            value: Set(value),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        active_model.insert(self.db.as_ref()).await.map_err(|e| {
            if is_unique_violation(&e) {
                tracing::debug!(%student_id, %activity_id, "Grade insert lost a race");
                AppError::DuplicateGrade(format!(
                    "student {student_id} already has a grade for activity {activity_id}"
                ))
            } else {
                db_error(e)
            }
        })
    }

    /// Change the value of a grade loaded through the scope.
    pub async fn update_value(
        &self,
        grade: grade::Model,
        value: Decimal,
    ) -> AppResult<grade::Model> {
        let mut active: grade::ActiveModel = grade.into();
        active.value = Set(value);
        active.updated_at = Set(Some(Utc::now().into()));

        active.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Delete a grade. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Grade::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }

    /// List every grade regardless of owner (admin only).
    pub async fn find_all(&self) -> AppResult<Vec<grade::Model>> {
        Grade::find()
            .order_by(grade::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr, Value};

    fn create_test_grade(value: &str) -> grade::Model {
        grade::Model {
            id: "g1".to_string(),
            student_id: "st1".to_string(),
            activity_id: "a1".to_string(),
            value: Decimal::from_str(value).unwrap(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_exists_for_pair() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(1))
                }]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let repo = GradeRepository::new(db);
        assert!(repo.exists_for_pair("st1", "a1").await.unwrap());
        assert!(!repo.exists_for_pair("st1", "a2").await.unwrap());
    }

    #[tokio::test]
    async fn test_create() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_grade("8.50")]])
                .into_connection(),
        );

        let repo = GradeRepository::new(db);
        let grade = repo
            .create(
                "g1".to_string(),
                "st1".to_string(),
                "a1".to_string(),
                Decimal::from_str("8.50").unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(grade.value.to_string(), "8.50");
    }

    #[tokio::test]
    async fn test_create_database_failure_is_not_duplicate() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "connection reset".to_string(),
                ))])
                .into_connection(),
        );

        let repo = GradeRepository::new(db);
        let result = repo
            .create(
                "g1".to_string(),
                "st1".to_string(),
                "a1".to_string(),
                Decimal::from_str("8.50").unwrap(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_scoped_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<grade::Model>::new()])
                .into_connection(),
        );

        let repo = GradeRepository::new(db);
        let result = repo.get_scoped(&TeacherScope::new("t2"), "g1").await;

        assert!(matches!(result, Err(AppError::GradeNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_value() {
        let mut updated = create_test_grade("9.00");
        updated.updated_at = Some(Utc::now().into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[updated]])
                .into_connection(),
        );

        let repo = GradeRepository::new(db);
        let result = repo
            .update_value(create_test_grade("8.50"), Decimal::from_str("9.00").unwrap())
            .await
            .unwrap();

        assert_eq!(result.value, Decimal::from_str("9.00").unwrap());
        assert!(result.updated_at.is_some());
    }
}
