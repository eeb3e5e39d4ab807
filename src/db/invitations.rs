use std::collections::HashMap;

use crate::db::database_service::DatabaseService;
use crate::db::groups::{add_member, is_member};
use crate::types::error::AppError;
use crate::types::invitation::{InvitationAction, InvitationView};
use chrono::Utc;
use entity::bug_group::Entity as BugGroup;
use entity::group_invitation::{
    ActiveModel as InviteActive, Entity as Invite, InvitationStatus, Model as InviteModel,
};
use entity::user::Entity as User;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

impl DatabaseService {
    pub async fn create_invitation(
        &self,
        group_id: Uuid,
        invited_by: Uuid,
        username: &str,
    ) -> Result<InviteModel, AppError> {
        let target = self.get_user_by_username(username).await?;

        let txn = self.database_connection.begin().await?;
        if is_member(&txn, group_id, target.id).await? {
            txn.rollback().await?;
            return Err(AppError::AlreadyExists);
        }
        let pending = Invite::find()
            .filter(entity::group_invitation::Column::GroupId.eq(group_id))
            .filter(entity::group_invitation::Column::InvitedUser.eq(target.id))
            .filter(entity::group_invitation::Column::Status.eq(InvitationStatus::Pending))
            .count(&txn)
            .await?;
        if pending > 0 {
            txn.rollback().await?;
            return Err(AppError::AlreadyExists);
        }

        let now = Utc::now();
        let invite = InviteActive {
            id: Set(Uuid::new_v4()),
            group_id: Set(group_id),
            invited_by: Set(invited_by),
            invited_user: Set(target.id),
            status: Set(InvitationStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(invitation_id = %invite.id, %group_id, invited_user = %target.id, "invitation created");
        Ok(invite)
    }

    pub async fn get_invitation(&self, id: Uuid) -> Result<InviteModel, AppError> {
        Ok(Invite::find_by_id(id)
            .one(&self.database_connection)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Invitation not found".into()))?)
    }

    pub async fn count_pending_invitations(&self, user_id: Uuid) -> Result<u64, AppError> {
        Ok(Invite::find()
            .filter(entity::group_invitation::Column::InvitedUser.eq(user_id))
            .filter(entity::group_invitation::Column::Status.eq(InvitationStatus::Pending))
            .count(&self.database_connection)
            .await?)
    }

    pub async fn list_pending_invitations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<InvitationView>, AppError> {
        let rows = Invite::find()
            .filter(entity::group_invitation::Column::InvitedUser.eq(user_id))
            .filter(entity::group_invitation::Column::Status.eq(InvitationStatus::Pending))
            .order_by_desc(entity::group_invitation::Column::CreatedAt)
            .all(&self.database_connection)
            .await?;
        self.hydrate_invitations(rows).await
    }

    pub async fn list_pending_invitations_for_group(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<InvitationView>, AppError> {
        let rows = Invite::find()
            .filter(entity::group_invitation::Column::GroupId.eq(group_id))
            .filter(entity::group_invitation::Column::Status.eq(InvitationStatus::Pending))
            .order_by_desc(entity::group_invitation::Column::CreatedAt)
            .all(&self.database_connection)
            .await?;
        self.hydrate_invitations(rows).await
    }

    /// Accept or reject. Only the invitee may answer, and only once.
    pub async fn respond_to_invitation(
        &self,
        invitation_id: Uuid,
        user_id: Uuid,
        action: InvitationAction,
    ) -> Result<InviteModel, AppError> {
        let txn = self.database_connection.begin().await?;

        let inv = Invite::find_by_id(invitation_id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Invitation not found".into()))?;

        if inv.invited_user != user_id {
            txn.rollback().await?;
            return Err(AppError::NotFound);
        }
        if inv.status != InvitationStatus::Pending {
            txn.rollback().await?;
            return Err(AppError::Conflict("invitation already answered".into()));
        }

        let group_id = inv.group_id;
        let mut am: InviteActive = inv.into();
        am.status = Set(action.resulting_status());
        am.updated_at = Set(Utc::now());
        let updated = am.update(&txn).await?;

        if action == InvitationAction::Accept && !is_member(&txn, group_id, user_id).await? {
            add_member(&txn, group_id, user_id).await?;
        }

        txn.commit().await?;
        info!(%invitation_id, %user_id, ?action, "invitation answered");
        Ok(updated)
    }

    /// Hard-delete a pending invitation (cancel).
    pub async fn cancel_invitation(&self, group_id: Uuid, invitation_id: Uuid) -> Result<(), AppError> {
        let res = Invite::delete_many()
            .filter(entity::group_invitation::Column::Id.eq(invitation_id))
            .filter(entity::group_invitation::Column::GroupId.eq(group_id))
            .filter(entity::group_invitation::Column::Status.eq(InvitationStatus::Pending))
            .exec(&self.database_connection)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        info!(%invitation_id, %group_id, "invitation cancelled");
        Ok(())
    }

    async fn hydrate_invitations(&self, rows: Vec<InviteModel>) -> Result<Vec<InvitationView>, AppError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let user_ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|r| [r.invited_by, r.invited_user])
            .collect();
        let group_ids: Vec<Uuid> = rows.iter().map(|r| r.group_id).collect();

        let usernames: HashMap<Uuid, String> = User::find()
            .filter(entity::user::Column::Id.is_in(user_ids))
            .all(&self.database_connection)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let group_names: HashMap<Uuid, String> = BugGroup::find()
            .filter(entity::bug_group::Column::Id.is_in(group_ids))
            .all(&self.database_connection)
            .await?
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect();

        let name_of = |id: &Uuid, names: &HashMap<Uuid, String>| names.get(id).cloned().unwrap_or_default();

        Ok(rows
            .into_iter()
            .map(|r| InvitationView {
                id: r.id,
                group_id: r.group_id,
                group_name: name_of(&r.group_id, &group_names),
                invited_by: r.invited_by,
                invited_by_name: name_of(&r.invited_by, &usernames),
                invited_user: r.invited_user,
                invited_user_name: name_of(&r.invited_user, &usernames),
                status: r.status,
                created_at: r.created_at,
            })
            .collect())
    }
}
