use sea_orm_migration::prelude::*;

use crate::m20251004_101500_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Subscription {
    Table,
    UserId,
    Plan,
    BugsRemaining,
    LastReset,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    Id,
    UserId,
    Plan,
    OrderId,
    PaymentId,
    Amount,
    Currency,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        // one row per user, created lazily on first quota lookup
        m.create_table(
            Table::create()
                .table(Subscription::Table)
                .if_not_exists()
                .col(ColumnDef::new(Subscription::UserId).uuid().not_null().primary_key())
                .col(ColumnDef::new(Subscription::Plan).string_len(20).not_null().default("free"))
                .col(ColumnDef::new(Subscription::BugsRemaining).integer().not_null())
                .col(ColumnDef::new(Subscription::LastReset).date().not_null())
                .col(ColumnDef::new(Subscription::ExpiresAt).timestamp_with_time_zone().null())
                .col(ColumnDef::new(Subscription::CreatedAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Subscription::UpdatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_subscription_user")
                        .from(Subscription::Table, Subscription::UserId)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        m.create_table(
            Table::create()
                .table(Payment::Table)
                .if_not_exists()
                .col(ColumnDef::new(Payment::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Payment::UserId).uuid().not_null())
                .col(ColumnDef::new(Payment::Plan).string_len(20).not_null())
                .col(ColumnDef::new(Payment::OrderId).string_len(64).not_null().unique_key())
                .col(ColumnDef::new(Payment::PaymentId).string_len(64).null())
                .col(ColumnDef::new(Payment::Amount).big_integer().not_null())
                .col(ColumnDef::new(Payment::Currency).string_len(3).not_null())
                .col(ColumnDef::new(Payment::Status).string_len(20).not_null().default("created"))
                .col(ColumnDef::new(Payment::CreatedAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Payment::UpdatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_payment_user")
                        .from(Payment::Table, Payment::UserId)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_payment_user")
                .table(Payment::Table)
                .col(Payment::UserId)
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(Payment::Table).if_exists().to_owned()).await?;
        m.drop_table(Table::drop().table(Subscription::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}
