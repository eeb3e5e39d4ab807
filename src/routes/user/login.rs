use crate::config::EnvConfig;
use crate::db::database_service::DatabaseService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::{RUserLogin, UserLoginRes};
use actix_web::{post, web};
use chrono::Duration;
use std::sync::Arc;

#[post("/login")]
pub async fn login(
    _req: actix_web::HttpRequest,
    db: web::Data<Arc<DatabaseService>>,
    config: web::Data<EnvConfig>,
    body: web::Json<RUserLogin>,
) -> ApiResult<UserLoginRes> {
    let user = db.verify_credentials(body.username.trim(), &body.password).await?;
    let (token, expires_at) = db
        .create_session(user.id, Duration::hours(config.session_ttl_hours))
        .await?;

    Ok(ApiResponse::Ok(UserLoginRes { token, expires_at }))
}
