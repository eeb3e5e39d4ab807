use crate::db::database_service::DatabaseService;
use crate::db::subscriptions::{activate_plan, refresh_subscription};
use crate::types::error::AppError;
use crate::types::payment::Settlement;
use crate::utils::gateway::GatewayOrder;
use chrono::{Duration, Utc};
use entity::payment::{ActiveModel as PaymentActive, Entity as Payment, Model as PaymentModel, PaymentStatus};
use entity::subscription::Plan;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

impl DatabaseService {
    pub async fn create_payment(
        &self,
        user_id: Uuid,
        plan: Plan,
        order: &GatewayOrder,
    ) -> Result<PaymentModel, AppError> {
        let now = Utc::now();
        let payment = PaymentActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            plan: Set(plan),
            order_id: Set(order.id.clone()),
            payment_id: Set(None),
            amount: Set(order.amount),
            currency: Set(order.currency.clone()),
            status: Set(PaymentStatus::Created),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.database_connection)
        .await?;

        info!(payment = %payment.id, order_id = %payment.order_id, %user_id, ?plan, "payment recorded");
        Ok(payment)
    }

    pub async fn get_payment_by_order(&self, order_id: &str) -> Result<PaymentModel, AppError> {
        Ok(Payment::find()
            .filter(entity::payment::Column::OrderId.eq(order_id))
            .one(&self.database_connection)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Payment not found".into()))?)
    }

    pub async fn list_payments_for_user(&self, user_id: Uuid) -> Result<Vec<PaymentModel>, AppError> {
        Ok(Payment::find()
            .filter(entity::payment::Column::UserId.eq(user_id))
            .order_by_desc(entity::payment::Column::CreatedAt)
            .all(&self.database_connection)
            .await?)
    }

    /// Marks an unsettled order as failed. Paid orders are never downgraded.
    pub async fn mark_payment_failed(&self, order_id: &str) -> Result<bool, AppError> {
        let res = Payment::update_many()
            .col_expr(entity::payment::Column::Status, Expr::value(PaymentStatus::Failed.into_value()))
            .col_expr(entity::payment::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::payment::Column::OrderId.eq(order_id))
            .filter(entity::payment::Column::Status.eq(PaymentStatus::Created))
            .exec(&self.database_connection)
            .await?;
        if res.rows_affected > 0 {
            warn!(%order_id, "payment marked failed");
        }
        Ok(res.rows_affected > 0)
    }

    /// Records a verified payment and activates its plan, once.
    ///
    /// A replay of the same payment id returns `AlreadyPaid` without touching
    /// the subscription; a different payment id for a paid order is a conflict.
    pub async fn settle_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        plan_duration: Duration,
    ) -> Result<Settlement, AppError> {
        let now = Utc::now();
        let txn = self.database_connection.begin().await?;

        let payment = Payment::find()
            .filter(entity::payment::Column::OrderId.eq(order_id))
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Payment not found".into()))?;

        if payment.status == PaymentStatus::Paid {
            let same = payment.payment_id.as_deref() == Some(payment_id);
            if !same {
                txn.rollback().await?;
                return Err(AppError::Conflict("order already settled by another payment".into()));
            }
            let sub = refresh_subscription(&txn, payment.user_id, now).await?;
            txn.commit().await?;
            info!(%order_id, %payment_id, "duplicate payment callback ignored");
            return Ok(Settlement::AlreadyPaid(sub));
        }

        // Only the transition out of an unsettled state may activate the plan.
        let claimed = Payment::update_many()
            .col_expr(entity::payment::Column::Status, Expr::value(PaymentStatus::Paid.into_value()))
            .col_expr(entity::payment::Column::PaymentId, Expr::value(Some(payment_id.to_string())))
            .col_expr(entity::payment::Column::UpdatedAt, Expr::value(now))
            .filter(entity::payment::Column::Id.eq(payment.id))
            .filter(entity::payment::Column::Status.ne(PaymentStatus::Paid))
            .exec(&txn)
            .await?;
        if claimed.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::Conflict("payment settled concurrently".into()));
        }

        let sub = activate_plan(&txn, payment.user_id, payment.plan, now, plan_duration).await?;
        txn.commit().await?;

        info!(%order_id, %payment_id, user_id = %payment.user_id, plan = ?payment.plan, "payment settled");
        Ok(Settlement::Activated(sub))
    }
}
