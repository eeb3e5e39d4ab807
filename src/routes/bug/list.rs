use crate::db::database_service::DatabaseService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{get, web};
use entity::bug::Model as BugModel;
use std::sync::Arc;
use uuid::Uuid;

#[get("/{group}/bugs")]
pub async fn list_bugs(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
    path: web::Path<Uuid>,
) -> ApiResult<Vec<BugModel>> {
    let (group, _) = db.require_member(path.into_inner(), user.id).await?;
    Ok(ApiResponse::Ok(db.list_bugs(group.id).await?))
}
