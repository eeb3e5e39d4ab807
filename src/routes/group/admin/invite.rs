use crate::db::database_service::DatabaseService;
use crate::types::invitation::{InviteRes, RGroupInviteUser};
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{post, web};
use std::sync::Arc;
use uuid::Uuid;

/*
Admins invite by username. The invitee sees it on their home screen and
becomes a plain member once they accept.
 */

#[post("/{group}/invitations")]
pub async fn invite(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
    data: web::Json<RGroupInviteUser>,
) -> ApiResult<InviteRes> {
    let (group, _) = db.require_admin(path.into_inner(), user.id).await?;
    let username = data.username.trim();

    let invite = db.create_invitation(group.id, user.id, username).await?;

    Ok(ApiResponse::Created(InviteRes {
        id: invite.id,
        message: format!("{username} has been invited to {}.", group.name),
    }))
}
