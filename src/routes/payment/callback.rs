use crate::config::EnvConfig;
use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::payment::{PaymentCallbackRes, RPaymentCallback, Settlement};
use crate::types::response::{ApiResponse, ApiResult};
use crate::utils::gateway::PaymentGateway;
use actix_web::{post, web, Either};
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, warn};

/*
The gateway's checkout posts here once the customer has paid. No bearer token:
the HMAC signature over order and payment id is the only proof we get, so
nothing is touched before it checks out.
 */

#[post("/callback")]
pub async fn callback(
    db: web::Data<Arc<DatabaseService>>,
    config: web::Data<EnvConfig>,
    gateway: web::Data<Arc<dyn PaymentGateway>>,
    body: Either<web::Json<RPaymentCallback>, web::Form<RPaymentCallback>>,
) -> ApiResult<PaymentCallbackRes> {
    let data = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };

    // Unknown orders are rejected before the signature is looked at.
    db.get_payment_by_order(&data.order_id).await?;

    if !gateway.verify_signature(&data.order_id, &data.payment_id, &data.signature) {
        warn!(order_id = %data.order_id, "payment callback with bad signature");
        if !db.mark_payment_failed(&data.order_id).await? {
            debug!(order_id = %data.order_id, "order not awaiting payment, status kept");
        }
        return Err(AppError::BadRequest("invalid payment signature".to_string()));
    }

    let duration = Duration::days(config.payment.plan_duration_days);
    let (message, sub) = match db
        .settle_payment(&data.order_id, &data.payment_id, duration)
        .await?
    {
        Settlement::Activated(sub) => ("Payment received, plan activated.", sub),
        Settlement::AlreadyPaid(sub) => ("Payment already processed.", sub),
    };

    Ok(ApiResponse::Ok(PaymentCallbackRes {
        message: message.to_string(),
        plan: sub.plan,
        expires_at: sub.expires_at,
    }))
}
