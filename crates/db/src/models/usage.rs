//! Row type for the `user_usage` table.

use serde::Serialize;
use teian_core::entitlement::UsageSnapshot;
use teian_core::types::{Timestamp, UserId};

/// A user's lifetime usage counter and subscription entitlement record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserUsage {
    pub user_id: UserId,
    pub proposals_created: i32,
    pub is_paid: bool,
    pub subscription_status: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserUsage {
    /// The entitlement view consumed by the usage gate.
    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            proposals_created: self.proposals_created,
            is_paid: self.is_paid,
            subscription_status: self.subscription_status.clone(),
        }
    }
}
