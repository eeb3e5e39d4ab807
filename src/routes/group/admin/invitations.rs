use crate::db::database_service::DatabaseService;
use crate::types::invitation::InvitationView;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{delete, get, web};
use std::sync::Arc;
use uuid::Uuid;

#[get("/{group}/invitations")]
pub async fn list_group_invitations(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
) -> ApiResult<Vec<InvitationView>> {
    let (group, _) = db.require_admin(path.into_inner(), user.id).await?;
    let pending = db.list_pending_invitations_for_group(group.id).await?;
    Ok(ApiResponse::Ok(pending))
}

#[delete("/{group}/invitations/{invitation}")]
pub async fn cancel_invitation(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    let (group_id, invitation_id) = path.into_inner();
    let (group, _) = db.require_admin(group_id, user.id).await?;
    db.cancel_invitation(group.id, invitation_id).await?;
    Ok(ApiResponse::NoContent)
}
