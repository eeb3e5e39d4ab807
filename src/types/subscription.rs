use chrono::{DateTime, NaiveDate, Utc};
use entity::subscription::Plan;
use serde::{Deserialize, Serialize};

/// The mutable part of a subscription row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    pub plan: Plan,
    pub bugs_remaining: i32,
    pub last_reset: NaiveDate,
    pub expires_at: Option<DateTime<Utc>>,
}

impl QuotaState {
    pub fn fresh(plan: Plan, now: DateTime<Utc>) -> Self {
        QuotaState {
            plan,
            bugs_remaining: plan.daily_quota(),
            last_reset: now.date_naive(),
            expires_at: None,
        }
    }

    /// Applies expiry and the daily reset as of `now`.
    ///
    /// An expired paid plan drops to free before the reset is considered. A
    /// downgrade also clamps today's remaining count to the free quota, so
    /// expiring mid-day never leaves more than the free allowance.
    pub fn rolled_over(self, now: DateTime<Utc>) -> Self {
        let mut next = self;

        if next.plan.is_paid() && next.expires_at.is_some_and(|exp| exp <= now) {
            next.plan = Plan::Free;
            next.expires_at = None;
            next.bugs_remaining = next.bugs_remaining.min(Plan::Free.daily_quota());
        }

        let today = now.date_naive();
        if next.last_reset < today {
            next.bugs_remaining = next.plan.daily_quota();
            next.last_reset = today;
        }

        next
    }

    pub fn activated(plan: Plan, now: DateTime<Utc>, duration: chrono::Duration) -> Self {
        QuotaState {
            plan,
            bugs_remaining: plan.daily_quota(),
            last_reset: now.date_naive(),
            expires_at: plan.is_paid().then(|| now + duration),
        }
    }
}

impl From<&entity::subscription::Model> for QuotaState {
    fn from(m: &entity::subscription::Model) -> Self {
        QuotaState {
            plan: m.plan,
            bugs_remaining: m.bugs_remaining,
            last_reset: m.last_reset,
            expires_at: m.expires_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubscriptionRes {
    pub plan: Plan,
    pub daily_quota: i32,
    pub bugs_remaining: i32,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<entity::subscription::Model> for SubscriptionRes {
    fn from(m: entity::subscription::Model) -> Self {
        SubscriptionRes {
            plan: m.plan,
            daily_quota: m.plan.daily_quota(),
            bugs_remaining: m.bugs_remaining,
            expires_at: m.expires_at,
        }
    }
}
