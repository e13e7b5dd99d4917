//! Create subject table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Subject::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Subject::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Subject::TeacherId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Subject::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_teacher")
                            .from(Subject::Table, Subject::TeacherId)
                            .to(Teacher::Table, Teacher::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: teacher_id (every scoped query starts here)
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_teacher_id")
                    .table(Subject::Table)
                    .col(Subject::TeacherId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Subject {
    Table,
    Id,
    Name,
    TeacherId,
    CreatedAt,
}

#[derive(Iden)]
enum Teacher {
    Table,
    Id,
}
