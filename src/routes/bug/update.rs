use crate::db::database_service::DatabaseService;
use crate::types::bug::RBugUpdate;
use crate::types::error::AppError;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{patch, web};
use entity::bug::Model as BugModel;
use std::sync::Arc;
use uuid::Uuid;

#[patch("/{group}/bugs/{bug}")]
pub async fn update_status(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<(Uuid, Uuid)>,
    data: web::Json<RBugUpdate>,
) -> ApiResult<BugModel> {
    let (group_id, bug_id) = path.into_inner();
    let (group, membership) = db.require_member(group_id, user.id).await?;
    let bug = db.get_bug(group.id, bug_id).await?;

    if bug.created_by != user.id && !membership.can_triage() {
        return Err(AppError::Forbidden);
    }

    let updated = db.update_bug_status(group.id, bug.id, data.status).await?;
    Ok(ApiResponse::Ok(updated))
}
