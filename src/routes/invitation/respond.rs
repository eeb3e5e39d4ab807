use crate::db::database_service::DatabaseService;
use crate::types::group::MessageRes;
use crate::types::invitation::InvitationAction;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{post, web};
use std::sync::Arc;
use uuid::Uuid;

async fn respond(
    db: &DatabaseService,
    user: &AuthUser,
    invitation_id: Uuid,
    action: InvitationAction,
) -> ApiResult<MessageRes> {
    let invite = db.respond_to_invitation(invitation_id, user.id, action).await?;
    let group = db.get_group(invite.group_id).await?;

    let message = match action {
        InvitationAction::Accept => format!("You have joined {}.", group.name),
        InvitationAction::Reject => format!("Invitation to {} declined.", group.name),
    };
    Ok(ApiResponse::Ok(MessageRes { message }))
}

#[post("/{invitation}/accept")]
pub async fn accept(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
) -> ApiResult<MessageRes> {
    respond(&db, &user, path.into_inner(), InvitationAction::Accept).await
}

#[post("/{invitation}/reject")]
pub async fn reject(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
) -> ApiResult<MessageRes> {
    respond(&db, &user, path.into_inner(), InvitationAction::Reject).await
}
