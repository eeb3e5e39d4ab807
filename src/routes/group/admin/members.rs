use crate::db::database_service::DatabaseService;
use crate::types::group::{MessageRes, RSetRole};
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{delete, post, put, web};
use std::sync::Arc;
use uuid::Uuid;

#[post("/{group}/members/{user}/admin")]
pub async fn make_admin(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<MessageRes> {
    let (group_id, target) = path.into_inner();
    let (group, _) = db.require_admin(group_id, user.id).await?;
    db.make_admin(group.id, target).await?;

    Ok(ApiResponse::Ok(MessageRes {
        message: format!("User is now an admin of {}.", group.name),
    }))
}

#[put("/{group}/members/{user}/role")]
pub async fn set_role(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Json<RSetRole>,
) -> ApiResult<MessageRes> {
    let (group_id, target) = path.into_inner();
    let (group, _) = db.require_admin(group_id, user.id).await?;
    db.set_member_role(group.id, target, data.role).await?;

    Ok(ApiResponse::Ok(MessageRes {
        message: "Member role updated.".to_string(),
    }))
}

#[delete("/{group}/members/{user}")]
pub async fn remove_member(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    let (group_id, target) = path.into_inner();
    let (group, _) = db.require_admin(group_id, user.id).await?;
    db.remove_member(group.id, target).await?;
    Ok(ApiResponse::NoContent)
}
