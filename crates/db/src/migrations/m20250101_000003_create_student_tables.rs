//! Create student and student_subject tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Student::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Student::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Student::Email).string_len(254).not_null())
                    .col(
                        ColumnDef::new(Student::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: email
        manager
            .create_index(
                Index::create()
                    .name("idx_student_email")
                    .table(Student::Table)
                    .col(Student::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentSubject::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StudentSubject::StudentId).string_len(32).not_null())
                    .col(ColumnDef::new(StudentSubject::SubjectId).string_len(32).not_null())
                    .primary_key(
                        Index::create()
                            .col(StudentSubject::StudentId)
                            .col(StudentSubject::SubjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_subject_student")
                            .from(StudentSubject::Table, StudentSubject::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_subject_subject")
                            .from(StudentSubject::Table, StudentSubject::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: subject_id (listing a teacher's students)
        manager
            .create_index(
                Index::create()
                    .name("idx_student_subject_subject_id")
                    .table(StudentSubject::Table)
                    .col(StudentSubject::SubjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentSubject::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
    Name,
    Email,
    CreatedAt,
}

#[derive(Iden)]
enum StudentSubject {
    Table,
    StudentId,
    SubjectId,
}

#[derive(Iden)]
enum Subject {
    Table,
    Id,
}
