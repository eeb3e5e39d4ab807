use crate::config::EnvConfig;
use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::payment::{CheckoutRes, RCheckout};
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::AuthUser;
use crate::utils::gateway::{OrderRequest, PaymentGateway};
use actix_web::{post, web};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[post("/checkout")]
pub async fn checkout(
    db: web::Data<Arc<DatabaseService>>,
    config: web::Data<EnvConfig>,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    user: web::ReqData<AuthUser>,
    data: web::Json<RCheckout>,
) -> ApiResult<CheckoutRes> {
    let plan = data.plan;
    let amount = config
        .payment
        .price_of(plan)
        .ok_or_else(|| AppError::Validation("the free plan needs no checkout".to_string()))?;

    // Gateway receipts are capped at 40 characters.
    let receipt = format!("rcpt_{}", Uuid::new_v4().simple());
    let order = gateway
        .create_order(OrderRequest {
            amount,
            currency: config.payment.currency.clone(),
            receipt,
        })
        .await?;

    let payment = db.create_payment(user.id, plan, &order).await?;
    info!(user_id = %user.id, order_id = %payment.order_id, ?plan, "checkout started");

    Ok(ApiResponse::Created(CheckoutRes {
        order_id: payment.order_id,
        amount: payment.amount,
        currency: payment.currency,
        key_id: gateway.key_id().to_string(),
        plan,
    }))
}
