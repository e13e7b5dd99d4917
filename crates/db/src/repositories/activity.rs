//! Activity repository.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use gradebook_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Order, QueryOrder, Set};

use super::db_error;
use crate::entities::{Activity, activity, activity::Category};
use crate::scope::TeacherScope;

/// Input for creating or editing an activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    /// Subject the activity belongs to; must already be checked against the scope.
    pub subject_id: String,
    pub name: String,
    pub category: Category,
    pub date: NaiveDate,
}

/// Repository for activity operations.
#[derive(Clone)]
pub struct ActivityRepository {
    db: Arc<DatabaseConnection>,
}

impl ActivityRepository {
    /// Create a new activity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an activity under one of the teacher's subjects.
    pub async fn find_scoped(
        &self,
        scope: &TeacherScope,
        id: &str,
    ) -> AppResult<Option<activity::Model>> {
        scope
            .activity(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find an activity in scope, or fail with not-found.
    pub async fn get_scoped(&self, scope: &TeacherScope, id: &str) -> AppResult<activity::Model> {
        self.find_scoped(scope, id)
            .await?
            .ok_or_else(|| AppError::ActivityNotFound(id.to_string()))
    }

    /// List the teacher's activities, most recent date first.
    pub async fn list(&self, scope: &TeacherScope) -> AppResult<Vec<activity::Model>> {
        scope
            .activities()
            .order_by(activity::Column::Date, Order::Desc)
            .order_by(activity::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create an activity.
    pub async fn create(&self, id: String, input: NewActivity) -> AppResult<activity::Model> {
        let active_model = activity::ActiveModel {
            id: Set(id),
            subject_id: Set(input.subject_id),
            name: Set(input.name),
            category: Set(input.category),
            date: Set(input.date),
            created_at: Set(Utc::now().into()),
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Overwrite the editable fields of an activity loaded through the scope.
    pub async fn update(
        &self,
        activity: activity::Model,
        input: NewActivity,
    ) -> AppResult<activity::Model> {
        let mut active: activity::ActiveModel = activity.into();
        active.subject_id = Set(input.subject_id);
        active.name = Set(input.name);
        active.category = Set(input.category);
        active.date = Set(input.date);

        active.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Delete an activity; its grades cascade.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Activity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }

    /// List every activity regardless of owner (admin only).
    pub async fn find_all(&self) -> AppResult<Vec<activity::Model>> {
        Activity::find()
            .order_by(activity::Column::Date, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn midterm() -> activity::Model {
        activity::Model {
            id: "a1".to_string(),
            subject_id: "s1".to_string(),
            name: "Midterm".to_string(),
            category: Category::Exam,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_scoped_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<activity::Model>::new()])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db);
        let result = repo.get_scoped(&TeacherScope::new("t2"), "a1").await;

        assert!(matches!(result, Err(AppError::ActivityNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_orders_by_date_desc() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[midterm()]])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db.clone());
        let result = repo.list(&TeacherScope::new("t1")).await.unwrap();
        assert_eq!(result.len(), 1);

        drop(repo);
        let conn = Arc::try_unwrap(db).unwrap();
        let log = format!("{:?}", conn.into_transaction_log());
        assert!(log.contains("ORDER BY \\\"activity\\\".\\\"date\\\" DESC"));
    }

    #[tokio::test]
    async fn test_create() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[midterm()]])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db);
        let created = repo
            .create(
                "a1".to_string(),
                NewActivity {
                    subject_id: "s1".to_string(),
                    name: "Midterm".to_string(),
                    category: Category::Exam,
                    date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.category, Category::Exam);
    }
}
