//! Grade service.

use std::collections::BTreeMap;

use gradebook_common::{AppResult, IdGenerator};
use gradebook_db::{
    TeacherScope,
    entities::{activity, grade, student},
    repositories::{ActivityRepository, GradeRepository, StudentRepository},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::grading::{self, GradeRejection, RawGrade};

/// Service for recording grades.
#[derive(Clone)]
pub struct GradeService {
    grade_repo: GradeRepository,
    student_repo: StudentRepository,
    activity_repo: ActivityRepository,
    id_gen: IdGenerator,
}

/// Input for recording a grade.
#[derive(Debug, Deserialize)]
pub struct CreateGradeInput {
    pub student_id: String,
    pub activity_id: String,
    pub value: RawGrade,
}

/// Input for changing a grade's value.
#[derive(Debug, Deserialize)]
pub struct UpdateGradeInput {
    pub value: RawGrade,
}

/// Everything the grade entry page needs, already scoped to one teacher.
#[derive(Debug, Clone, Default)]
pub struct GradeSheet {
    /// Newest first.
    pub grades: Vec<grade::Model>,
    pub students: Vec<student::Model>,
    /// Latest date first.
    pub activities: Vec<activity::Model>,
    /// Activity ID to subject ID.
    pub activity_subjects: BTreeMap<String, String>,
    /// Student ID to the teacher's subjects they are enrolled in.
    pub student_subjects: BTreeMap<String, Vec<String>>,
}

impl GradeService {
    /// Create a new grade service.
    #[must_use]
    pub const fn new(
        grade_repo: GradeRepository,
        student_repo: StudentRepository,
        activity_repo: ActivityRepository,
    ) -> Self {
        Self {
            grade_repo,
            student_repo,
            activity_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Build the grade sheet for the teacher.
    pub async fn sheet(&self, scope: &TeacherScope) -> AppResult<GradeSheet> {
        let grades = self.grade_repo.list(scope).await?;
        let students = self.student_repo.list(scope).await?;
        let activities = self.activity_repo.list(scope).await?;

        let activity_subjects = activities
            .iter()
            .map(|a| (a.id.clone(), a.subject_id.clone()))
            .collect();

        let mut student_subjects: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for enrollment in self.student_repo.enrollments(scope).await? {
            student_subjects
                .entry(enrollment.student_id)
                .or_default()
                .push(enrollment.subject_id);
        }

        Ok(GradeSheet {
            grades,
            students,
            activities,
            activity_subjects,
            student_subjects,
        })
    }

    /// Run every grade check for a new grade.
    ///
    /// Both records must already have been loaded through the teacher's
    /// scope. Returns the value normalized to two decimal places.
    pub async fn validate_grade(
        &self,
        student: &student::Model,
        activity: &activity::Model,
        raw: &str,
    ) -> AppResult<Decimal> {
        let value = grading::validate_value(raw)?;

        if self
            .grade_repo
            .exists_for_pair(&student.id, &activity.id)
            .await?
        {
            return Err(GradeRejection::DuplicateGrade.into());
        }

        if !self
            .student_repo
            .is_enrolled(&student.id, &activity.subject_id)
            .await?
        {
            return Err(GradeRejection::NotEnrolled.into());
        }

        Ok(value)
    }

    /// Record a grade.
    pub async fn create(
        &self,
        scope: &TeacherScope,
        input: CreateGradeInput,
    ) -> AppResult<grade::Model> {
        let student = self
            .student_repo
            .get_scoped(scope, &input.student_id)
            .await?;
        let activity = self
            .activity_repo
            .get_scoped(scope, &input.activity_id)
            .await?;

        let value = self
            .validate_grade(&student, &activity, &input.value.as_text())
            .await?;

        let grade = self
            .grade_repo
            .create(self.id_gen.generate(), student.id, activity.id, value)
            .await?;

        tracing::debug!(grade_id = %grade.id, value = %grade.value, "Grade recorded");
        Ok(grade)
    }

    /// Change the value of one of the teacher's grades. Only the number is
    /// re-checked; the student and activity stay as they are.
    pub async fn update(
        &self,
        scope: &TeacherScope,
        id: &str,
        input: UpdateGradeInput,
    ) -> AppResult<grade::Model> {
        let grade = self.grade_repo.get_scoped(scope, id).await?;
        let value = grading::validate_value(&input.value.as_text())?;

        self.grade_repo.update_value(grade, value).await
    }

    /// Delete one of the teacher's grades.
    pub async fn delete(&self, scope: &TeacherScope, id: &str) -> AppResult<()> {
        let grade = self.grade_repo.get_scoped(scope, id).await?;
        self.grade_repo.delete(&grade.id).await?;

        tracing::debug!(grade_id = %grade.id, "Grade deleted");
        Ok(())
    }
}
