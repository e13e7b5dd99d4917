//! Subject service.

use gradebook_common::{AppResult, IdGenerator};
use gradebook_db::{TeacherScope, entities::subject, repositories::SubjectRepository};
use serde::Deserialize;
use validator::Validate;

/// Service for managing a teacher's subjects.
#[derive(Clone)]
pub struct SubjectService {
    subject_repo: SubjectRepository,
    id_gen: IdGenerator,
}

/// Input for creating or renaming a subject.
#[derive(Debug, Deserialize, Validate)]
pub struct SubjectInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl SubjectInput {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}

impl SubjectService {
    /// Create a new subject service.
    #[must_use]
    pub const fn new(subject_repo: SubjectRepository) -> Self {
        Self {
            subject_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List the teacher's subjects.
    pub async fn list(&self, scope: &TeacherScope) -> AppResult<Vec<subject::Model>> {
        self.subject_repo.list(scope).await
    }

    /// Get one of the teacher's subjects.
    pub async fn get(&self, scope: &TeacherScope, id: &str) -> AppResult<subject::Model> {
        self.subject_repo.get_scoped(scope, id).await
    }

    /// Create a subject owned by the teacher.
    pub async fn create(
        &self,
        scope: &TeacherScope,
        input: SubjectInput,
    ) -> AppResult<subject::Model> {
        let input = input.normalized();
        input.validate()?;

        let subject = self
            .subject_repo
            .create(scope, self.id_gen.generate(), input.name)
            .await?;

        tracing::debug!(subject_id = %subject.id, teacher_id = %scope.teacher_id(), "Subject created");
        Ok(subject)
    }

    /// Rename one of the teacher's subjects.
    pub async fn update(
        &self,
        scope: &TeacherScope,
        id: &str,
        input: SubjectInput,
    ) -> AppResult<subject::Model> {
        let subject = self.subject_repo.get_scoped(scope, id).await?;
        let input = input.normalized();
        input.validate()?;

        self.subject_repo.rename(subject, input.name).await
    }

    /// Delete one of the teacher's subjects along with its activities,
    /// their grades and the enrollments in it.
    pub async fn delete(&self, scope: &TeacherScope, id: &str) -> AppResult<()> {
        let subject = self.subject_repo.get_scoped(scope, id).await?;
        self.subject_repo.delete(&subject.id).await?;

        tracing::info!(subject_id = %subject.id, teacher_id = %scope.teacher_id(), "Subject deleted");
        Ok(())
    }
}
