//! Ownership scoping.
//!
//! A [`TeacherScope`] is the only way to obtain queries over subjects,
//! students, activities and grades that respect ownership:
//!
//! - `subjects`   = subjects whose `teacher_id` is the scope's teacher
//! - `students`   = students enrolled in at least one of those subjects (distinct)
//! - `activities` = activities whose subject is one of those subjects
//! - `grades`     = grades whose activity is one of those activities
//!
//! A record that exists but falls outside the scope is indistinguishable from
//! a record that does not exist: scoped lookups simply return `None`.
//!
//! ```rust,ignore
//! let scope = TeacherScope::new(&teacher.id);
//! let maybe_subject = scope.subject(&subject_id).one(db).await?;
//! ```

use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait, Select,
    sea_query::{Expr, Query, SelectStatement},
};

use crate::entities::{
    Activity, Grade, Student, StudentSubject, Subject, activity, grade, student,
    student_subject, subject,
};

/// Query scope for one authenticated teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherScope {
    teacher_id: String,
}

impl TeacherScope {
    /// Create a scope for the given teacher ID.
    ///
    /// Callers must pass the ID of the authenticated teacher, never an ID taken
    /// from request input.
    #[must_use]
    pub fn new(teacher_id: impl Into<String>) -> Self {
        Self {
            teacher_id: teacher_id.into(),
        }
    }

    /// The teacher this scope belongs to.
    #[must_use]
    pub fn teacher_id(&self) -> &str {
        &self.teacher_id
    }

    /// Subjects owned by the teacher.
    #[must_use]
    pub fn subjects(&self) -> Select<Subject> {
        Subject::find().filter(subject::Column::TeacherId.eq(self.teacher_id.as_str()))
    }

    /// A single subject, if owned by the teacher.
    #[must_use]
    pub fn subject(&self, id: &str) -> Select<Subject> {
        self.subjects().filter(subject::Column::Id.eq(id))
    }

    /// Students enrolled in at least one of the teacher's subjects.
    #[must_use]
    pub fn students(&self) -> Select<Student> {
        Student::find().filter(student::Column::Id.in_subquery(self.enrolled_student_ids()))
    }

    /// A single student, if visible to the teacher.
    #[must_use]
    pub fn student(&self, id: &str) -> Select<Student> {
        self.students().filter(student::Column::Id.eq(id))
    }

    /// Enrollment rows that point at the teacher's subjects.
    #[must_use]
    pub fn enrollments(&self) -> Select<StudentSubject> {
        StudentSubject::find()
            .join(JoinType::InnerJoin, student_subject::Relation::Subject.def())
            .filter(subject::Column::TeacherId.eq(self.teacher_id.as_str()))
    }

    /// Activities under the teacher's subjects.
    #[must_use]
    pub fn activities(&self) -> Select<Activity> {
        Activity::find()
            .join(JoinType::InnerJoin, activity::Relation::Subject.def())
            .filter(subject::Column::TeacherId.eq(self.teacher_id.as_str()))
    }

    /// A single activity, if under one of the teacher's subjects.
    #[must_use]
    pub fn activity(&self, id: &str) -> Select<Activity> {
        self.activities().filter(activity::Column::Id.eq(id))
    }

    /// Grades recorded on the teacher's activities.
    #[must_use]
    pub fn grades(&self) -> Select<Grade> {
        Grade::find()
            .join(JoinType::InnerJoin, grade::Relation::Activity.def())
            .join(JoinType::InnerJoin, activity::Relation::Subject.def())
            .filter(subject::Column::TeacherId.eq(self.teacher_id.as_str()))
    }

    /// A single grade, if recorded on one of the teacher's activities.
    #[must_use]
    pub fn grade(&self, id: &str) -> Select<Grade> {
        self.grades().filter(grade::Column::Id.eq(id))
    }

    /// `SELECT id FROM subject WHERE teacher_id = ?`, for use in `IN (...)` filters
    /// on bulk deletes where a join is not available.
    #[must_use]
    pub fn subject_ids(&self) -> SelectStatement {
        Query::select()
            .column((subject::Entity, subject::Column::Id))
            .from(subject::Entity)
            .and_where(
                Expr::col((subject::Entity, subject::Column::TeacherId))
                    .eq(self.teacher_id.as_str()),
            )
            .to_owned()
    }

    /// `SELECT activity.id FROM activity JOIN subject ... WHERE teacher_id = ?`
    #[must_use]
    pub fn activity_ids(&self) -> SelectStatement {
        Query::select()
            .column((activity::Entity, activity::Column::Id))
            .from(activity::Entity)
            .inner_join(
                subject::Entity,
                Expr::col((subject::Entity, subject::Column::Id))
                    .equals((activity::Entity, activity::Column::SubjectId)),
            )
            .and_where(
                Expr::col((subject::Entity, subject::Column::TeacherId))
                    .eq(self.teacher_id.as_str()),
            )
            .to_owned()
    }

    /// `SELECT student_id FROM student_subject JOIN subject ... WHERE teacher_id = ?`
    fn enrolled_student_ids(&self) -> SelectStatement {
        Query::select()
            .column((student_subject::Entity, student_subject::Column::StudentId))
            .from(student_subject::Entity)
            .inner_join(
                subject::Entity,
                Expr::col((subject::Entity, subject::Column::Id))
                    .equals((student_subject::Entity, student_subject::Column::SubjectId)),
            )
            .and_where(
                Expr::col((subject::Entity, subject::Column::TeacherId))
                    .eq(self.teacher_id.as_str()),
            )
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait, sea_query::PostgresQueryBuilder};

    fn sql<E: EntityTrait>(select: Select<E>) -> String {
        select.build(DatabaseBackend::Postgres).to_string()
    }

    #[test]
    fn test_subjects_filter_by_owner() {
        let scope = TeacherScope::new("t1");
        let query = sql(scope.subjects());

        assert!(query.contains(r#""subject"."teacher_id" = 't1'"#));
    }

    #[test]
    fn test_subject_lookup_keeps_owner_filter() {
        let scope = TeacherScope::new("t1");
        let query = sql(scope.subject("s1"));

        assert!(query.contains(r#""subject"."teacher_id" = 't1'"#));
        assert!(query.contains(r#""subject"."id" = 's1'"#));
    }

    #[test]
    fn test_students_go_through_enrollment() {
        let scope = TeacherScope::new("t1");
        let query = sql(scope.student("st1"));

        assert!(query.contains(r#""student"."id" IN (SELECT "student_subject"."student_id""#));
        assert!(query.contains(r#""subject"."teacher_id" = 't1'"#));
        assert!(query.contains(r#""student"."id" = 'st1'"#));
    }

    #[test]
    fn test_activities_join_subject() {
        let scope = TeacherScope::new("t1");
        let query = sql(scope.activity("a1"));

        assert!(query.contains(r#"INNER JOIN "subject""#));
        assert!(query.contains(r#""subject"."teacher_id" = 't1'"#));
        assert!(query.contains(r#""activity"."id" = 'a1'"#));
    }

    #[test]
    fn test_grades_join_activity_and_subject() {
        let scope = TeacherScope::new("t1");
        let query = sql(scope.grade("g1"));

        assert!(query.contains(r#"INNER JOIN "activity""#));
        assert!(query.contains(r#"INNER JOIN "subject""#));
        assert!(query.contains(r#""subject"."teacher_id" = 't1'"#));
        assert!(query.contains(r#""grade"."id" = 'g1'"#));
    }

    #[test]
    fn test_id_subqueries_filter_by_owner() {
        let scope = TeacherScope::new("t1");

        let subjects = scope.subject_ids().to_string(PostgresQueryBuilder);
        assert!(subjects.contains(r#"SELECT "subject"."id" FROM "subject""#));
        assert!(subjects.contains(r#""subject"."teacher_id" = 't1'"#));

        let activities = scope.activity_ids().to_string(PostgresQueryBuilder);
        assert!(activities.contains(r#"SELECT "activity"."id" FROM "activity""#));
        assert!(activities.contains(r#""subject"."teacher_id" = 't1'"#));
    }

    #[test]
    fn test_scopes_for_different_teachers_differ() {
        let a = sql(TeacherScope::new("alice").subjects());
        let b = sql(TeacherScope::new("bob").subjects());

        assert_ne!(a, b);
        assert!(!a.contains("bob"));
    }
}
