//! Payment gateway client.
//!
//! Orders are created server-side over the gateway's REST API; the customer
//! pays in the gateway's checkout, which then posts `order_id`, `payment_id`
//! and a signature back to us. The signature is
//! `hex(HMAC-SHA256(key_secret, "{order_id}|{payment_id}"))`.

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, error, info};

use crate::config::PaymentConfig;
use crate::types::error::AppError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key id the client-side checkout needs.
    fn key_id(&self) -> &str;

    async fn create_order(&self, order: OrderRequest) -> Result<GatewayOrder, AppError>;

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

fn mac_for(secret: &str, order_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    Some(mac)
}

pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
    mac_for(secret, order_id, payment_id)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Constant-time check of a hex signature.
pub fn signature_matches(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    mac_for(secret, order_id, payment_id)
        .is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

pub struct RazorpayGateway {
    client: Client,
    api_base: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(config: &PaymentConfig) -> Result<Self, AppError> {
        let client = ClientBuilder::new()
            .user_agent("bugnest/0.1 (+reqwest)")
            .tcp_nodelay(true)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("build client failed: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, order: OrderRequest) -> Result<GatewayOrder, AppError> {
        let url = format!("{}/orders", self.api_base);
        debug!(%url, amount = order.amount, currency = %order.currency, receipt = %order.receipt, "creating gateway order");

        let res = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&order)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "gateway request failed");
                AppError::Gateway(format!("send failed: {e}"))
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(%status, %body, "gateway rejected order");
            return Err(AppError::Gateway(format!("HTTP {status}")));
        }

        let created: GatewayOrder = res
            .json()
            .await
            .map_err(|e| AppError::Gateway(format!("decode order failed: {e}")))?;
        info!(order_id = %created.id, "gateway order created");
        Ok(created)
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signature_matches(&self.key_secret, order_id, payment_id, signature)
    }
}
