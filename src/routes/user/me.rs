use crate::db::database_service::DatabaseService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::{AuthUser, MeRes};
use actix_web::{get, web};
use std::sync::Arc;

/// Everything the home screen shows for the caller.
#[get("/me")]
pub async fn me(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
) -> ApiResult<MeRes> {
    let groups = db.list_groups_for_user(user.id).await?;
    let pending_invitations = db.count_pending_invitations(user.id).await?;
    let subscription = db.get_subscription(user.id).await?;

    Ok(ApiResponse::Ok(MeRes {
        id: user.id,
        username: user.username.clone(),
        groups: groups.into_iter().map(Into::into).collect(),
        pending_invitations,
        subscription: subscription.into(),
    }))
}
