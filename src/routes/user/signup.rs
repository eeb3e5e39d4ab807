use crate::db::database_service::DatabaseService;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::{validate_password, validate_username, DBUserCreate, RUserSignup, UserSignupRes};
use crate::utils::token::encrypt;
use crate::types::error::AppError;
use actix_web::{post, web};
use std::sync::Arc;

#[post("/signup")]
pub async fn signup(
    _req: actix_web::HttpRequest,
    db: web::Data<Arc<DatabaseService>>,
    body: web::Json<RUserSignup>,
) -> ApiResult<UserSignupRes> {
    let body = body.into_inner();
    let username = body.username.trim().to_string();
    validate_username(&username)?;
    validate_password(&body.password)?;

    let password_hash = encrypt(&body.password)
        .map_err(|e| AppError::Internal(format!("hash password: {e}")))?;

    let id = db
        .create_user(DBUserCreate {
            username: username.clone(),
            password_hash,
        })
        .await?;

    Ok(ApiResponse::Created(UserSignupRes { id, username }))
}
