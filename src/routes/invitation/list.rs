use crate::db::database_service::DatabaseService;
use crate::types::invitation::InvitationView;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{get, web};
use std::sync::Arc;

#[get("")]
pub async fn list_invitations(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
) -> ApiResult<Vec<InvitationView>> {
    Ok(ApiResponse::Ok(db.list_pending_invitations_for_user(user.id).await?))
}
