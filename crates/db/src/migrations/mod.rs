//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_teacher_table;
mod m20250101_000002_create_subject_table;
mod m20250101_000003_create_student_tables;
mod m20250101_000004_create_activity_table;
mod m20250101_000005_create_grade_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_teacher_table::Migration),
            Box::new(m20250101_000002_create_subject_table::Migration),
            Box::new(m20250101_000003_create_student_tables::Migration),
            Box::new(m20250101_000004_create_activity_table::Migration),
            Box::new(m20250101_000005_create_grade_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(names.len(), 5);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
