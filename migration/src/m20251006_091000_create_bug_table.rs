use sea_orm_migration::prelude::*;

use crate::m20251004_101500_create_user_table::User;
use crate::m20251004_102200_create_group_tables::BugGroup;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bug::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bug::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bug::GroupId).uuid().not_null())
                    .col(ColumnDef::new(Bug::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Bug::Description).text().not_null())
                    .col(ColumnDef::new(Bug::Status).string_len(20).not_null().default("Open"))
                    .col(ColumnDef::new(Bug::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Bug::CreatedByName).string_len(150).not_null())
                    .col(ColumnDef::new(Bug::StartDate).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Bug::DueDate).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Bug::EstimatedHours).integer().null())
                    .col(ColumnDef::new(Bug::Attachment).string_len(500).null())
                    .col(ColumnDef::new(Bug::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Bug::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bug_group")
                            .from(Bug::Table, Bug::GroupId)
                            .to(BugGroup::Table, BugGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bug_reporter")
                            .from(Bug::Table, Bug::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bug_group_created")
                    .table(Bug::Table)
                    .col(Bug::GroupId)
                    .col(Bug::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bug::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bug {
    Table,
    Id,
    GroupId,
    Title,
    Description,
    Status,
    CreatedBy,
    CreatedByName,
    StartDate,
    DueDate,
    EstimatedHours,
    Attachment,
    CreatedAt,
    UpdatedAt,
}
