//! Create report table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Report::Type).string_len(16).not_null())
                    .col(ColumnDef::new(Report::TargetId).big_integer().not_null())
                    .col(ColumnDef::new(Report::Reason).string_len(512).not_null())
                    .col(ColumnDef::new(Report::Description).text())
                    .col(
                        ColumnDef::new(Report::SubmittedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Report::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Report::ResolvedBy).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_submitter")
                            .from(Report::Table, Report::SubmittedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_resolver")
                            .from(Report::Table, Report::ResolvedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (submitted_by, target_id) - a user may file at most
        // one report per target. This index is the authoritative guard
        // against a concurrent double-submit.
        manager
            .create_index(
                Index::create()
                    .name("idx_report_submitted_by_target_id")
                    .table(Report::Table)
                    .col(Report::SubmittedBy)
                    .col(Report::TargetId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: created_at (list ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_report_created_at")
                    .table(Report::Table)
                    .col(Report::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
    Type,
    TargetId,
    Reason,
    Description,
    SubmittedBy,
    CreatedAt,
    ResolvedAt,
    ResolvedBy,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
