use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use crate::utils::media::MediaStore;
use actix_web::{delete, web};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

#[delete("/{group}/bugs/{bug}")]
pub async fn delete_bug(
    db: web::Data<Arc<DatabaseService>>,
    media: web::Data<MediaStore>,
    user: web::ReqData<AuthUser>,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<()> {
    let (group_id, bug_id) = path.into_inner();
    let (group, membership) = db.require_member(group_id, user.id).await?;
    let bug = db.get_bug(group.id, bug_id).await?;

    if bug.created_by != user.id && !membership.is_admin {
        return Err(AppError::Forbidden);
    }

    if let Some(path) = db.delete_bug(group.id, bug.id).await? {
        if let Err(e) = media.remove(&path).await {
            warn!(%path, error = %e, "failed to remove attachment of deleted bug");
        }
    }

    Ok(ApiResponse::NoContent)
}
