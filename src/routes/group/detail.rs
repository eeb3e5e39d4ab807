use crate::db::database_service::DatabaseService;
use crate::types::group::GroupDetailRes;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{get, web};
use std::sync::Arc;
use uuid::Uuid;

#[get("/{group}")]
pub async fn group_detail(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
) -> ApiResult<GroupDetailRes> {
    let (group, membership) = db.require_member(path.into_inner(), user.id).await?;
    let members = db.list_members(group.id).await?;

    Ok(ApiResponse::Ok(GroupDetailRes {
        created_at: group.created_at,
        group: group.into(),
        members,
        is_admin: membership.is_admin,
        is_creator: membership.is_creator,
    }))
}
