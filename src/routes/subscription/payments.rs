use crate::db::database_service::DatabaseService;
use crate::types::payment::PaymentView;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use actix_web::{get, web};
use std::sync::Arc;

#[get("/payments")]
pub async fn list_payments(
    db: web::Data<Arc<DatabaseService>>,
    user: web::ReqData<AuthUser>,
) -> ApiResult<Vec<PaymentView>> {
    let payments = db.list_payments_for_user(user.id).await?;
    Ok(ApiResponse::Ok(payments.into_iter().map(Into::into).collect()))
}
