//! Create grade table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Grade::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Grade::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Grade::StudentId).string_len(32).not_null())
                    .col(ColumnDef::new(Grade::ActivityId).string_len(32).not_null())
                    .col(ColumnDef::new(Grade::Value).decimal_len(5, 2).not_null())
                    .col(
                        ColumnDef::new(Grade::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Grade::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grade_student")
                            .from(Grade::Table, Grade::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grade_activity")
                            .from(Grade::Table, Grade::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(
                        Expr::col(Grade::Value)
                            .gte(0)
                            .and(Expr::col(Grade::Value).lte(10)),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (student_id, activity_id) - one grade per student per activity
        manager
            .create_index(
                Index::create()
                    .name("idx_grade_student_activity_unique")
                    .table(Grade::Table)
                    .col(Grade::StudentId)
                    .col(Grade::ActivityId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: activity_id (scoped grade listing joins through activity)
        manager
            .create_index(
                Index::create()
                    .name("idx_grade_activity_id")
                    .table(Grade::Table)
                    .col(Grade::ActivityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Grade::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Grade {
    Table,
    Id,
    StudentId,
    ActivityId,
    Value,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
}

#[derive(Iden)]
enum Activity {
    Table,
    Id,
}
