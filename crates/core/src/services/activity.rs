//! Activity service.

use chrono::NaiveDate;
use gradebook_common::{AppError, AppResult, IdGenerator};
use gradebook_db::{
    TeacherScope,
    entities::activity::{self, Category},
    repositories::{ActivityRepository, NewActivity, SubjectRepository},
};
use serde::Deserialize;
use validator::Validate;

/// Service for managing activities under a teacher's subjects.
#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityRepository,
    subject_repo: SubjectRepository,
    id_gen: IdGenerator,
}

/// Input for creating or editing an activity.
#[derive(Debug, Deserialize, Validate)]
pub struct ActivityInput {
    pub subject_id: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// One of `exam`, `assignment`, `practice`, `other`, in any case.
    pub category: Category,

    /// Calendar date as `YYYY-MM-DD`.
    pub date: String,
}

impl ActivityService {
    /// Create a new activity service.
    #[must_use]
    pub const fn new(activity_repo: ActivityRepository, subject_repo: SubjectRepository) -> Self {
        Self {
            activity_repo,
            subject_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List the teacher's activities, latest date first.
    pub async fn list(&self, scope: &TeacherScope) -> AppResult<Vec<activity::Model>> {
        self.activity_repo.list(scope).await
    }

    /// Get one of the teacher's activities.
    pub async fn get(&self, scope: &TeacherScope, id: &str) -> AppResult<activity::Model> {
        self.activity_repo.get_scoped(scope, id).await
    }

    /// Create an activity under one of the teacher's subjects.
    pub async fn create(
        &self,
        scope: &TeacherScope,
        input: ActivityInput,
    ) -> AppResult<activity::Model> {
        let new_activity = self.prepare(scope, input).await?;
        let activity = self
            .activity_repo
            .create(self.id_gen.generate(), new_activity)
            .await?;

        tracing::debug!(activity_id = %activity.id, subject_id = %activity.subject_id, "Activity created");
        Ok(activity)
    }

    /// Edit one of the teacher's activities. It may move to another of the
    /// teacher's subjects.
    pub async fn update(
        &self,
        scope: &TeacherScope,
        id: &str,
        input: ActivityInput,
    ) -> AppResult<activity::Model> {
        let activity = self.activity_repo.get_scoped(scope, id).await?;
        let new_activity = self.prepare(scope, input).await?;

        self.activity_repo.update(activity, new_activity).await
    }

    /// Delete one of the teacher's activities and its grades.
    pub async fn delete(&self, scope: &TeacherScope, id: &str) -> AppResult<()> {
        let activity = self.activity_repo.get_scoped(scope, id).await?;
        self.activity_repo.delete(&activity.id).await?;

        tracing::info!(activity_id = %activity.id, teacher_id = %scope.teacher_id(), "Activity deleted");
        Ok(())
    }

    async fn prepare(&self, scope: &TeacherScope, input: ActivityInput) -> AppResult<NewActivity> {
        let input = ActivityInput {
            name: input.name.trim().to_string(),
            ..input
        };
        input.validate()?;

        let date = parse_date(&input.date)?;

        let subject = self.subject_repo.get_scoped(scope, &input.subject_id).await?;

        Ok(NewActivity {
            subject_id: subject.id,
            name: input.name,
            category: input.category,
            date,
        })
    }
}

pub(crate) fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}
