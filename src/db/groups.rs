use std::collections::HashSet;

use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::group::{Membership, MemberView};
use chrono::Utc;
use entity::bug::Entity as Bug;
use entity::bug_group::{ActiveModel as GroupActive, Entity as BugGroup, Model as GroupModel};
use entity::group_admin::{ActiveModel as AdminActive, Entity as GroupAdmin};
use entity::group_invitation::Entity as Invitation;
use entity::group_member::{ActiveModel as MemberActive, Entity as GroupMember, Role};
use entity::user::Entity as User;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

/// Inserts a membership row with the default role.
pub(crate) async fn add_member<C: ConnectionTrait>(
    conn: &C,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<(), DbErr> {
    GroupMember::insert(MemberActive {
        group_id: Set(group_id),
        user_id: Set(user_id),
        role: Set(Role::Member),
        created_at: Set(Utc::now()),
    })
    .exec_without_returning(conn)
    .await?;
    Ok(())
}

pub(crate) async fn is_member<C: ConnectionTrait>(
    conn: &C,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<bool, DbErr> {
    Ok(GroupMember::find_by_id((group_id, user_id)).one(conn).await?.is_some())
}

impl DatabaseService {
    /// The creator becomes both a member and an admin.
    pub async fn create_group(
        &self,
        creator: Uuid,
        name: String,
        description: String,
    ) -> Result<GroupModel, AppError> {
        let gid = Uuid::new_v4();
        let now = Utc::now();
        let txn = self.database_connection.begin().await?;

        let group = GroupActive {
            id: Set(gid),
            name: Set(name),
            description: Set(description),
            created_by: Set(creator),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        add_member(&txn, gid, creator).await?;
        GroupAdmin::insert(AdminActive {
            group_id: Set(gid),
            user_id: Set(creator),
            created_at: Set(now),
        })
        .exec_without_returning(&txn)
        .await?;

        txn.commit().await?;
        info!(group_id = %gid, %creator, "group created");
        Ok(group)
    }

    pub async fn get_group(&self, id: Uuid) -> Result<GroupModel, AppError> {
        Ok(BugGroup::find_by_id(id)
            .one(&self.database_connection)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Group not found".into()))?)
    }

    pub async fn list_groups_for_user(&self, user_id: Uuid) -> Result<Vec<GroupModel>, AppError> {
        let group_ids: Vec<Uuid> = GroupMember::find()
            .filter(entity::group_member::Column::UserId.eq(user_id))
            .all(&self.database_connection)
            .await?
            .into_iter()
            .map(|m| m.group_id)
            .collect();

        if group_ids.is_empty() {
            return Ok(vec![]);
        }

        Ok(BugGroup::find()
            .filter(entity::bug_group::Column::Id.is_in(group_ids))
            .order_by_asc(entity::bug_group::Column::CreatedAt)
            .all(&self.database_connection)
            .await?)
    }

    /// What `user_id` is in `group_id`, if a member at all.
    pub async fn membership(
        &self,
        group: &GroupModel,
        user_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        let Some(member) = GroupMember::find_by_id((group.id, user_id))
            .one(&self.database_connection)
            .await?
        else {
            return Ok(None);
        };
        let is_admin = GroupAdmin::find_by_id((group.id, user_id))
            .one(&self.database_connection)
            .await?
            .is_some();

        Ok(Some(Membership {
            role: member.role,
            is_admin,
            is_creator: group.created_by == user_id,
        }))
    }

    /// Loads the group and fails with `Forbidden` for non-members.
    pub async fn require_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(GroupModel, Membership), AppError> {
        let group = self.get_group(group_id).await?;
        let membership = self.membership(&group, user_id).await?.ok_or(AppError::Forbidden)?;
        Ok((group, membership))
    }

    pub async fn require_admin(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(GroupModel, Membership), AppError> {
        let (group, membership) = self.require_member(group_id, user_id).await?;
        if !membership.is_admin {
            return Err(AppError::Forbidden);
        }
        Ok((group, membership))
    }

    pub async fn list_members(&self, group_id: Uuid) -> Result<Vec<MemberView>, AppError> {
        let admins: HashSet<Uuid> = GroupAdmin::find()
            .filter(entity::group_admin::Column::GroupId.eq(group_id))
            .all(&self.database_connection)
            .await?
            .into_iter()
            .map(|a| a.user_id)
            .collect();

        let rows = GroupMember::find()
            .filter(entity::group_member::Column::GroupId.eq(group_id))
            .order_by_asc(entity::group_member::Column::CreatedAt)
            .find_also_related(User)
            .all(&self.database_connection)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, user)| {
                let user = user?;
                Some(MemberView {
                    id: user.id,
                    username: user.username,
                    role: member.role,
                    is_admin: admins.contains(&user.id),
                })
            })
            .collect())
    }

    /// Grants the admin flag to an existing member. Granting twice is a no-op.
    pub async fn make_admin(&self, group_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        if !is_member(&self.database_connection, group_id, user_id).await? {
            return Err(AppError::NotFound);
        }
        let exists = GroupAdmin::find_by_id((group_id, user_id))
            .one(&self.database_connection)
            .await?
            .is_some();
        if !exists {
            GroupAdmin::insert(AdminActive {
                group_id: Set(group_id),
                user_id: Set(user_id),
                created_at: Set(Utc::now()),
            })
            .exec_without_returning(&self.database_connection)
            .await?;
            info!(%group_id, %user_id, "admin granted");
        }
        Ok(())
    }

    pub async fn set_member_role(&self, group_id: Uuid, user_id: Uuid, role: Role) -> Result<(), AppError> {
        let member = GroupMember::find_by_id((group_id, user_id))
            .one(&self.database_connection)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Member not found".into()))?;
        if member.role == role {
            return Ok(());
        }
        let mut am: MemberActive = member.into();
        am.role = Set(role);
        am.update(&self.database_connection).await?;
        info!(%group_id, %user_id, ?role, "member role changed");
        Ok(())
    }

    /// Drops membership and admin rows. The creator always stays.
    pub async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        let group = self.get_group(group_id).await?;
        if group.created_by == user_id {
            return Err(AppError::Conflict("the group creator cannot be removed".into()));
        }

        let txn = self.database_connection.begin().await?;
        let res = GroupMember::delete_by_id((group_id, user_id)).exec(&txn).await?;
        if res.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::NotFound);
        }
        GroupAdmin::delete_by_id((group_id, user_id)).exec(&txn).await?;
        txn.commit().await?;

        info!(%group_id, %user_id, "member removed");
        Ok(())
    }

    /// Deletes the group with everything hanging off it. Returns the attachment
    /// paths of the deleted bugs so the caller can clean up storage.
    pub async fn delete_group(&self, group_id: Uuid) -> Result<Vec<String>, AppError> {
        let txn = self.database_connection.begin().await?;

        let group = BugGroup::find_by_id(group_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Group not found".into()))?;

        let attachments: Vec<String> = Bug::find()
            .filter(entity::bug::Column::GroupId.eq(group_id))
            .all(&txn)
            .await?
            .into_iter()
            .filter_map(|b| b.attachment)
            .collect();

        Bug::delete_many()
            .filter(entity::bug::Column::GroupId.eq(group_id))
            .exec(&txn)
            .await?;
        Invitation::delete_many()
            .filter(entity::group_invitation::Column::GroupId.eq(group_id))
            .exec(&txn)
            .await?;
        GroupAdmin::delete_many()
            .filter(entity::group_admin::Column::GroupId.eq(group_id))
            .exec(&txn)
            .await?;
        GroupMember::delete_many()
            .filter(entity::group_member::Column::GroupId.eq(group_id))
            .exec(&txn)
            .await?;
        let am: GroupActive = group.into();
        am.delete(&txn).await?;

        txn.commit().await?;
        info!(%group_id, "group deleted");
        Ok(attachments)
    }
}
