use std::sync::Arc;

use actix_web::{dev::ServiceRequest, web, HttpMessage};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use tracing::{debug, warn};

use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;

/// Bearer validator for `HttpAuthentication::bearer`. On success the caller is
/// available to handlers as `web::ReqData<AuthUser>`.
pub async fn validate_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (actix_web::Error, ServiceRequest)> {
    let Some(db) = req.app_data::<web::Data<Arc<DatabaseService>>>().cloned() else {
        warn!("database service missing from app data");
        return Err((AppError::Internal("database unavailable".into()).into(), req));
    };

    match db.authenticate(credentials.token()).await {
        Ok(user) => {
            debug!(user_id = %user.id, "authenticated request");
            req.extensions_mut().insert(user);
            Ok(req)
        }
        Err(err) => Err((err.into(), req)),
    }
}
