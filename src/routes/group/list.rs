use crate::db::database_service::DatabaseService;
use crate::types::group::GroupSummary;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{get, web};
use std::sync::Arc;

#[get("")]
pub async fn list_groups(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
) -> ApiResult<Vec<GroupSummary>> {
    let groups = db.list_groups_for_user(user.id).await?;
    Ok(ApiResponse::Ok(groups.into_iter().map(Into::into).collect()))
}
