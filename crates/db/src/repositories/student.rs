//! Student repository.

use std::sync::Arc;

use chrono::Utc;
use gradebook_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{db_error, is_unique_violation};
use crate::entities::{Grade, Student, StudentSubject, grade, student, student_subject};
use crate::scope::TeacherScope;

/// Outcome of removing a student from a teacher's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentRemoval {
    /// The student is still enrolled with other teachers and was kept.
    Unenrolled,
    /// No enrollments remained, so the student row was deleted.
    Deleted,
}

/// Repository for student and enrollment operations.
#[derive(Clone)]
pub struct StudentRepository {
    db: Arc<DatabaseConnection>,
}

impl StudentRepository {
    /// Create a new student repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a student visible to the teacher.
    pub async fn find_scoped(
        &self,
        scope: &TeacherScope,
        id: &str,
    ) -> AppResult<Option<student::Model>> {
        scope
            .student(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a student visible to the teacher, or fail with not-found.
    pub async fn get_scoped(&self, scope: &TeacherScope, id: &str) -> AppResult<student::Model> {
        self.find_scoped(scope, id)
            .await?
            .ok_or_else(|| AppError::StudentNotFound(id.to_string()))
    }

    /// List the students visible to the teacher by name.
    pub async fn list(&self, scope: &TeacherScope) -> AppResult<Vec<student::Model>> {
        scope
            .students()
            .order_by(student::Column::Name, Order::Asc)
            .order_by(student::Column::Id, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Count the distinct students visible to the teacher.
    pub async fn count_scoped(&self, scope: &TeacherScope) -> AppResult<u64> {
        scope
            .students()
            .count(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a student by email, regardless of scope.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<student::Model>> {
        Student::find()
            .filter(student::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Subjects of the teacher the student is enrolled in.
    pub async fn subject_ids(
        &self,
        scope: &TeacherScope,
        student_id: &str,
    ) -> AppResult<Vec<String>> {
        scope
            .enrollments()
            .filter(student_subject::Column::StudentId.eq(student_id))
            .select_only()
            .column(student_subject::Column::SubjectId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Every enrollment row pointing at one of the teacher's subjects.
    pub async fn enrollments(
        &self,
        scope: &TeacherScope,
    ) -> AppResult<Vec<student_subject::Model>> {
        scope
            .enrollments()
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Check whether a student is enrolled in a subject.
    pub async fn is_enrolled(&self, student_id: &str, subject_id: &str) -> AppResult<bool> {
        let key = (student_id.to_string(), subject_id.to_string());
        let enrollment = StudentSubject::find_by_id(key)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(enrollment.is_some())
    }

    /// Create a student together with their enrollments.
    pub async fn create(
        &self,
        id: String,
        name: String,
        email: String,
        subject_ids: Vec<String>,
    ) -> AppResult<student::Model> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let active_model = student::ActiveModel {
            id: Set(id.clone()),
            name: Set(name),
            email: Set(email),
            created_at: Set(Utc::now().into()),
        };

        let student = active_model.insert(&txn).await.map_err(email_conflict)?;
        enroll(&txn, &id, subject_ids).await.map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        Ok(student)
    }

    /// Update a student and replace their enrollments in the teacher's
    /// subjects. Enrollments with other teachers are left alone.
    pub async fn update(
        &self,
        scope: &TeacherScope,
        student: student::Model,
        name: String,
        email: String,
        subject_ids: Vec<String>,
    ) -> AppResult<student::Model> {
        let student_id = student.id.clone();
        let txn = self.db.begin().await.map_err(db_error)?;

        let mut active: student::ActiveModel = student.into();
        active.name = Set(name);
        active.email = Set(email);
        let updated = active.update(&txn).await.map_err(email_conflict)?;

        StudentSubject::delete_many()
            .filter(student_subject::Column::StudentId.eq(student_id.as_str()))
            .filter(student_subject::Column::SubjectId.in_subquery(scope.subject_ids()))
            .exec(&txn)
            .await
            .map_err(db_error)?;

        enroll(&txn, &student_id, subject_ids)
            .await
            .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        Ok(updated)
    }

    /// Remove a student from the teacher's scope.
    ///
    /// Drops the student's grades on the teacher's activities and their
    /// enrollments in the teacher's subjects. The student row itself is
    /// deleted only when no enrollment is left.
    pub async fn remove_from_scope(
        &self,
        scope: &TeacherScope,
        student_id: &str,
    ) -> AppResult<StudentRemoval> {
        let txn = self.db.begin().await.map_err(db_error)?;

        Grade::delete_many()
            .filter(grade::Column::StudentId.eq(student_id))
            .filter(grade::Column::ActivityId.in_subquery(scope.activity_ids()))
            .exec(&txn)
            .await
            .map_err(db_error)?;

        StudentSubject::delete_many()
            .filter(student_subject::Column::StudentId.eq(student_id))
            .filter(student_subject::Column::SubjectId.in_subquery(scope.subject_ids()))
            .exec(&txn)
            .await
            .map_err(db_error)?;

        let remaining = StudentSubject::find()
            .filter(student_subject::Column::StudentId.eq(student_id))
            .count(&txn)
            .await
            .map_err(db_error)?;

        let removal = if remaining == 0 {
            Student::delete_by_id(student_id)
                .exec(&txn)
                .await
                .map_err(db_error)?;
            StudentRemoval::Deleted
        } else {
            StudentRemoval::Unenrolled
        };

        txn.commit().await.map_err(db_error)?;

        Ok(removal)
    }

    /// List every student regardless of scope (admin only).
    pub async fn find_all(&self) -> AppResult<Vec<student::Model>> {
        Student::find()
            .order_by(student::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Delete a student outright (admin only). Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Student::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }
}

async fn enroll<C: ConnectionTrait>(
    conn: &C,
    student_id: &str,
    subject_ids: Vec<String>,
) -> Result<(), DbErr> {
    if subject_ids.is_empty() {
        return Ok(());
    }

    let rows = subject_ids
        .into_iter()
        .map(|subject_id| student_subject::ActiveModel {
            student_id: Set(student_id.to_string()),
            subject_id: Set(subject_id),
        });

    StudentSubject::insert_many(rows)
        .exec_without_returning(conn)
        .await?;

    Ok(())
}

fn email_conflict(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict("Email already registered".to_string())
    } else {
        db_error(err)
    }
}
