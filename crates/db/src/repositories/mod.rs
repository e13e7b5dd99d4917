//! Data access repositories.

mod activity;
mod grade;
mod student;
mod subject;
mod teacher;

pub use activity::{ActivityRepository, NewActivity};
pub use grade::GradeRepository;
pub use student::{StudentRepository, StudentRemoval};
pub use subject::SubjectRepository;
pub use teacher::TeacherRepository;

use gradebook_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Whether a database error is a unique-constraint violation.
///
/// Application-level duplicate checks can race with a concurrent insert; the
/// unique indexes catch what the checks miss.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Convert a database error into an [`AppError::Database`].
pub(crate) fn db_error(err: DbErr) -> AppError {
    AppError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&DbErr::RecordNotFound("x".to_string())));
        assert!(!is_unique_violation(&DbErr::Custom("duplicate key".to_string())));
    }

    #[test]
    fn test_db_error_maps_to_database_variant() {
        let err = db_error(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, AppError::Database(msg) if msg.contains("boom")));
    }
}
