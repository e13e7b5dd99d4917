//! Create activity table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Activity::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Activity::SubjectId).string_len(32).not_null())
                    .col(ColumnDef::new(Activity::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Activity::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Activity::Date).date().not_null())
                    .col(
                        ColumnDef::new(Activity::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_subject")
                            .from(Activity::Table, Activity::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: subject_id
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_subject_id")
                    .table(Activity::Table)
                    .col(Activity::SubjectId)
                    .to_owned(),
            )
            .await?;

        // Index: date (grade sheet lists newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_date")
                    .table(Activity::Table)
                    .col(Activity::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Activity {
    Table,
    Id,
    SubjectId,
    Name,
    Category,
    Date,
    CreatedAt,
}

#[derive(Iden)]
enum Subject {
    Table,
    Id,
}
