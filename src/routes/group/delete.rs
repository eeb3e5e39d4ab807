use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use crate::utils::media::MediaStore;
use actix_web::{delete, web};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

#[delete("/{group}")]
pub async fn delete_group(
    db: web::Data<Arc<DatabaseService>>,
    media: web::Data<MediaStore>,
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
) -> ApiResult<()> {
    let (group, membership) = db.require_member(path.into_inner(), user.id).await?;
    if !membership.is_creator {
        return Err(AppError::Forbidden);
    }

    let attachments = db.delete_group(group.id).await?;
    for path in attachments {
        if let Err(e) = media.remove(&path).await {
            warn!(%path, error = %e, "failed to remove attachment of deleted group");
        }
    }

    Ok(ApiResponse::NoContent)
}
