//! Per-user plan and daily quota.
//!
//! Rows are created lazily and rolled over (expiry downgrade, daily reset) on
//! every read. Both the rollover and the quota decrement are conditional
//! updates, so two requests racing on the same row cannot reset twice or
//! spend the same unit twice.

use crate::db::database_service::DatabaseService;
use crate::types::error::AppError;
use crate::types::subscription::QuotaState;
use chrono::{DateTime, Duration, Utc};
use entity::subscription::{
    ActiveModel as SubscriptionActive, Column, Entity as Subscription, Model as SubscriptionModel,
    Plan,
};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveEnum, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use tracing::{debug, info};
use uuid::Uuid;

async fn find_or_create<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<SubscriptionModel, DbErr> {
    if let Some(sub) = Subscription::find_by_id(user_id).one(conn).await? {
        return Ok(sub);
    }

    let fresh = QuotaState::fresh(Plan::Free, now);
    Subscription::insert(SubscriptionActive {
        user_id: Set(user_id),
        plan: Set(fresh.plan),
        bugs_remaining: Set(fresh.bugs_remaining),
        last_reset: Set(fresh.last_reset),
        expires_at: Set(fresh.expires_at),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .on_conflict(OnConflict::column(Column::UserId).do_nothing().to_owned())
    .exec_without_returning(conn)
    .await?;
    debug!(%user_id, "free subscription created");

    Subscription::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("Subscription not found".into()))
}

/// Loads the row and persists expiry and the daily reset as of `now`.
pub(crate) async fn refresh_subscription<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<SubscriptionModel, DbErr> {
    let current = find_or_create(conn, user_id, now).await?;
    let before = QuotaState::from(&current);
    let after = before.rolled_over(now);
    if before == after {
        return Ok(current);
    }

    // Only the request that still sees the old (plan, last_reset) applies it.
    let res = Subscription::update_many()
        .col_expr(Column::Plan, Expr::value(after.plan.into_value()))
        .col_expr(Column::BugsRemaining, Expr::value(after.bugs_remaining))
        .col_expr(Column::LastReset, Expr::value(after.last_reset))
        .col_expr(Column::ExpiresAt, Expr::value(after.expires_at))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Plan.eq(before.plan))
        .filter(Column::LastReset.eq(before.last_reset))
        .exec(conn)
        .await?;
    if res.rows_affected > 0 {
        if after.plan != before.plan {
            info!(%user_id, from = ?before.plan, to = ?after.plan, "plan expired");
        }
        debug!(%user_id, remaining = after.bugs_remaining, "quota rolled over");
    }

    Subscription::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("Subscription not found".into()))
}

/// Takes one unit of today's quota. Returns what is left afterwards.
pub(crate) async fn consume_quota<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<i32, AppError> {
    refresh_subscription(conn, user_id, now).await?;

    let res = Subscription::update_many()
        .col_expr(Column::BugsRemaining, Expr::col(Column::BugsRemaining).sub(1))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::BugsRemaining.gt(0))
        .exec(conn)
        .await?;
    if res.rows_affected == 0 {
        info!(%user_id, "daily quota exhausted");
        return Err(AppError::QuotaExceeded);
    }

    let sub = Subscription::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("Subscription not found".into()))?;
    Ok(sub.bugs_remaining)
}

/// Switches the user to `plan` with a full quota for today.
pub(crate) async fn activate_plan<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    plan: Plan,
    now: DateTime<Utc>,
    duration: Duration,
) -> Result<SubscriptionModel, DbErr> {
    find_or_create(conn, user_id, now).await?;
    let next = QuotaState::activated(plan, now, duration);

    Subscription::update_many()
        .col_expr(Column::Plan, Expr::value(next.plan.into_value()))
        .col_expr(Column::BugsRemaining, Expr::value(next.bugs_remaining))
        .col_expr(Column::LastReset, Expr::value(next.last_reset))
        .col_expr(Column::ExpiresAt, Expr::value(next.expires_at))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    info!(%user_id, ?plan, expires_at = ?next.expires_at, "plan activated");

    Subscription::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("Subscription not found".into()))
}

impl DatabaseService {
    pub async fn get_subscription(&self, user_id: Uuid) -> Result<SubscriptionModel, AppError> {
        self.get_subscription_at(user_id, Utc::now()).await
    }

    /// Same as [`get_subscription`](Self::get_subscription) with an explicit clock.
    pub async fn get_subscription_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionModel, AppError> {
        Ok(refresh_subscription(&self.database_connection, user_id, now).await?)
    }
}
