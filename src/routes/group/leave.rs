use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::group::MessageRes;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{post, web};
use std::sync::Arc;
use uuid::Uuid;

#[post("/{group}/leave")]
pub async fn leave_group(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
) -> ApiResult<MessageRes> {
    let (group, membership) = db.require_member(path.into_inner(), user.id).await?;
    if membership.is_creator {
        return Err(AppError::Conflict(
            "the group creator cannot leave; delete the group instead".to_string(),
        ));
    }

    db.remove_member(group.id, user.id).await?;

    Ok(ApiResponse::Ok(MessageRes {
        message: format!("You have left {}.", group.name),
    }))
}
