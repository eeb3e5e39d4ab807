use crate::db::database_service::DatabaseService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::subscription::SubscriptionRes;
use crate::types::user::AuthUser;
use actix_web::{get, web};
use std::sync::Arc;

#[get("")]
pub async fn status(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
) -> ApiResult<SubscriptionRes> {
    Ok(ApiResponse::Ok(db.get_subscription(user.id).await?.into()))
}
