use chrono::{DateTime, Utc};
use entity::payment::PaymentStatus;
use entity::subscription::Plan;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RCheckout {
    pub plan: Plan,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CheckoutRes {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub plan: Plan,
}

/// Fields the gateway's checkout posts back once the customer has paid.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RPaymentCallback {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PaymentCallbackRes {
    pub message: String,
    pub plan: Plan,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaymentView {
    pub id: Uuid,
    pub plan: Plan,
    pub order_id: String,
    pub payment_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<entity::payment::Model> for PaymentView {
    fn from(p: entity::payment::Model) -> Self {
        PaymentView {
            id: p.id,
            plan: p.plan,
            order_id: p.order_id,
            payment_id: p.payment_id,
            amount: p.amount,
            currency: p.currency,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

/// Outcome of reconciling a callback against the stored order.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// First successful callback; the plan was activated.
    Activated(entity::subscription::Model),
    /// The same payment was already settled earlier.
    AlreadyPaid(entity::subscription::Model),
}
