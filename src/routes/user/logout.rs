use crate::db::database_service::DatabaseService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{post, web};
use std::sync::Arc;

#[post("/logout")]
pub async fn logout(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
) -> ApiResult<()> {
    db.delete_session(user.session_id).await?;
    Ok(ApiResponse::NoContent)
}
