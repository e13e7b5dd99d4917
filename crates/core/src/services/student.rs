//! Student service.

use std::collections::{BTreeMap, HashSet};

use gradebook_common::{AppError, AppResult, IdGenerator};
use gradebook_db::{
    TeacherScope,
    entities::student,
    repositories::{StudentRemoval, StudentRepository, SubjectRepository},
};
use serde::Deserialize;
use validator::Validate;

/// Service for managing the students a teacher can see.
#[derive(Clone)]
pub struct StudentService {
    student_repo: StudentRepository,
    subject_repo: SubjectRepository,
    id_gen: IdGenerator,
}

/// Input for creating or editing a student.
#[derive(Debug, Deserialize, Validate)]
pub struct StudentInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    /// Subjects of the acting teacher the student takes.
    #[validate(length(min = 1, message = "Select at least one subject"))]
    pub subject_ids: Vec<String>,
}

impl StudentInput {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject_ids: dedup(self.subject_ids),
        }
    }
}

/// A student with their enrollments in the acting teacher's subjects.
#[derive(Debug, Clone)]
pub struct StudentDetail {
    pub student: student::Model,
    pub subject_ids: Vec<String>,
}

impl StudentService {
    /// Create a new student service.
    #[must_use]
    pub const fn new(student_repo: StudentRepository, subject_repo: SubjectRepository) -> Self {
        Self {
            student_repo,
            subject_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List the students enrolled in the teacher's subjects.
    pub async fn list(&self, scope: &TeacherScope) -> AppResult<Vec<StudentDetail>> {
        let students = self.student_repo.list(scope).await?;
        let mut enrollments = self.subjects_by_student(scope).await?;

        Ok(students
            .into_iter()
            .map(|student| StudentDetail {
                subject_ids: enrollments.remove(&student.id).unwrap_or_default(),
                student,
            })
            .collect())
    }

    /// Map of student ID to the teacher's subjects they are enrolled in.
    pub async fn subjects_by_student(
        &self,
        scope: &TeacherScope,
    ) -> AppResult<BTreeMap<String, Vec<String>>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for enrollment in self.student_repo.enrollments(scope).await? {
            map.entry(enrollment.student_id)
                .or_default()
                .push(enrollment.subject_id);
        }
        Ok(map)
    }

    /// Get a student visible to the teacher.
    pub async fn get(&self, scope: &TeacherScope, id: &str) -> AppResult<StudentDetail> {
        let student = self.student_repo.get_scoped(scope, id).await?;
        let subject_ids = self.student_repo.subject_ids(scope, &student.id).await?;

        Ok(StudentDetail {
            student,
            subject_ids,
        })
    }

    /// Create a student enrolled in some of the teacher's subjects.
    pub async fn create(
        &self,
        scope: &TeacherScope,
        input: StudentInput,
    ) -> AppResult<StudentDetail> {
        let input = input.normalized();
        input.validate()?;

        self.ensure_owned_subjects(scope, &input.subject_ids).await?;
        self.ensure_email_free(&input.email, None).await?;

        let student = self
            .student_repo
            .create(
                self.id_gen.generate(),
                input.name,
                input.email,
                input.subject_ids.clone(),
            )
            .await?;

        tracing::debug!(student_id = %student.id, teacher_id = %scope.teacher_id(), "Student created");

        Ok(StudentDetail {
            student,
            subject_ids: input.subject_ids,
        })
    }

    /// Edit a student. Only enrollments in the teacher's own subjects change.
    pub async fn update(
        &self,
        scope: &TeacherScope,
        id: &str,
        input: StudentInput,
    ) -> AppResult<StudentDetail> {
        let student = self.student_repo.get_scoped(scope, id).await?;

        let input = input.normalized();
        input.validate()?;

        self.ensure_owned_subjects(scope, &input.subject_ids).await?;
        self.ensure_email_free(&input.email, Some(&student.id))
            .await?;

        let student = self
            .student_repo
            .update(
                scope,
                student,
                input.name,
                input.email,
                input.subject_ids.clone(),
            )
            .await?;

        Ok(StudentDetail {
            student,
            subject_ids: input.subject_ids,
        })
    }

    /// Remove a student from the teacher's classes.
    ///
    /// The student record survives while another teacher still has them
    /// enrolled.
    pub async fn delete(&self, scope: &TeacherScope, id: &str) -> AppResult<StudentRemoval> {
        let student = self.student_repo.get_scoped(scope, id).await?;
        let removal = self
            .student_repo
            .remove_from_scope(scope, &student.id)
            .await?;

        tracing::info!(
            student_id = %student.id,
            teacher_id = %scope.teacher_id(),
            ?removal,
            "Student removed"
        );
        Ok(removal)
    }

    async fn ensure_owned_subjects(&self, scope: &TeacherScope, ids: &[String]) -> AppResult<()> {
        let owned: HashSet<String> = self
            .subject_repo
            .owned_ids(scope, ids)
            .await?
            .into_iter()
            .collect();

        match ids.iter().find(|id| !owned.contains(*id)) {
            Some(missing) => Err(AppError::SubjectNotFound(missing.clone())),
            None => Ok(()),
        }
    }

    async fn ensure_email_free(&self, email: &str, current_id: Option<&str>) -> AppResult<()> {
        match self.student_repo.find_by_email(email).await? {
            Some(existing) if Some(existing.id.as_str()) != current_id => Err(AppError::Conflict(
                "Email already registered".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
