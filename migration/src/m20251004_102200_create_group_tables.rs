use sea_orm_migration::prelude::*;

use crate::m20251004_101500_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(crate) enum BugGroup {
    Table,
    Id,
    Name,
    Description,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupMember {
    Table,
    GroupId,
    UserId,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupAdmin {
    Table,
    GroupId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupInvitation {
    Table,
    Id,
    GroupId,
    InvitedBy,
    InvitedUser,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.create_table(
            Table::create()
                .table(BugGroup::Table)
                .if_not_exists()
                .col(ColumnDef::new(BugGroup::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(BugGroup::Name).string_len(200).not_null())
                .col(ColumnDef::new(BugGroup::Description).text().not_null().default(""))
                .col(ColumnDef::new(BugGroup::CreatedBy).uuid().not_null())
                .col(ColumnDef::new(BugGroup::CreatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_bug_group_creator")
                        .from(BugGroup::Table, BugGroup::CreatedBy)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        // membership rows carry the role; the admin flag lives in its own table
        m.create_table(
            Table::create()
                .table(GroupMember::Table)
                .if_not_exists()
                .col(ColumnDef::new(GroupMember::GroupId).uuid().not_null())
                .col(ColumnDef::new(GroupMember::UserId).uuid().not_null())
                .col(ColumnDef::new(GroupMember::Role).string_len(20).not_null().default("member"))
                .col(ColumnDef::new(GroupMember::CreatedAt).timestamp_with_time_zone().not_null())
                .primary_key(
                    Index::create()
                        .name("pk_group_member")
                        .col(GroupMember::GroupId)
                        .col(GroupMember::UserId)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_group_member_group")
                        .from(GroupMember::Table, GroupMember::GroupId)
                        .to(BugGroup::Table, BugGroup::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_group_member_user")
                        .from(GroupMember::Table, GroupMember::UserId)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_group_member_user")
                .table(GroupMember::Table)
                .col(GroupMember::UserId)
                .to_owned(),
        ).await?;

        m.create_table(
            Table::create()
                .table(GroupAdmin::Table)
                .if_not_exists()
                .col(ColumnDef::new(GroupAdmin::GroupId).uuid().not_null())
                .col(ColumnDef::new(GroupAdmin::UserId).uuid().not_null())
                .col(ColumnDef::new(GroupAdmin::CreatedAt).timestamp_with_time_zone().not_null())
                .primary_key(
                    Index::create()
                        .name("pk_group_admin")
                        .col(GroupAdmin::GroupId)
                        .col(GroupAdmin::UserId)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_group_admin_group")
                        .from(GroupAdmin::Table, GroupAdmin::GroupId)
                        .to(BugGroup::Table, BugGroup::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_group_admin_user")
                        .from(GroupAdmin::Table, GroupAdmin::UserId)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        m.create_table(
            Table::create()
                .table(GroupInvitation::Table)
                .if_not_exists()
                .col(ColumnDef::new(GroupInvitation::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(GroupInvitation::GroupId).uuid().not_null())
                .col(ColumnDef::new(GroupInvitation::InvitedBy).uuid().not_null())
                .col(ColumnDef::new(GroupInvitation::InvitedUser).uuid().not_null())
                .col(ColumnDef::new(GroupInvitation::Status).string_len(20).not_null().default("pending"))
                .col(ColumnDef::new(GroupInvitation::CreatedAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(GroupInvitation::UpdatedAt).timestamp_with_time_zone().not_null())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_group_invitation_group")
                        .from(GroupInvitation::Table, GroupInvitation::GroupId)
                        .to(BugGroup::Table, BugGroup::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_group_invitation_inviter")
                        .from(GroupInvitation::Table, GroupInvitation::InvitedBy)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_group_invitation_invitee")
                        .from(GroupInvitation::Table, GroupInvitation::InvitedUser)
                        .to(User::Table, User::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned(),
        ).await?;

        m.create_index(
            Index::create()
                .name("idx_group_invitation_invitee_status")
                .table(GroupInvitation::Table)
                .col(GroupInvitation::InvitedUser)
                .col(GroupInvitation::Status)
                .to_owned(),
        ).await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(Table::drop().table(GroupInvitation::Table).if_exists().to_owned()).await?;
        m.drop_table(Table::drop().table(GroupAdmin::Table).if_exists().to_owned()).await?;
        m.drop_table(Table::drop().table(GroupMember::Table).if_exists().to_owned()).await?;
        m.drop_table(Table::drop().table(BugGroup::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}
