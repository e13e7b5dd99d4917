//! Create teacher table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teacher::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teacher::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Teacher::Username).string_len(150).not_null())
                    .col(ColumnDef::new(Teacher::UsernameLower).string_len(150).not_null())
                    .col(ColumnDef::new(Teacher::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Teacher::FirstName).string_len(150).not_null().default(""))
                    .col(ColumnDef::new(Teacher::LastName).string_len(150).not_null().default(""))
                    .col(ColumnDef::new(Teacher::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(Teacher::Token).string_len(64))
                    .col(ColumnDef::new(Teacher::IsAdmin).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Teacher::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Teacher::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: username_lower (case-insensitive login names)
        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_username_lower")
                    .table(Teacher::Table)
                    .col(Teacher::UsernameLower)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: token (authentication lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_teacher_token")
                    .table(Teacher::Table)
                    .col(Teacher::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Teacher::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Teacher {
    Table,
    Id,
    Username,
    UsernameLower,
    Email,
    FirstName,
    LastName,
    PasswordHash,
    Token,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}
