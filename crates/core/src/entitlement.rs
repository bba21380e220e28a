//! Free-tier quota and subscription entitlement decisions.
//!
//! The generation endpoint consults [`check_allowance`] before any model
//! call. Entitlement fields are written only by the billing synchronizer;
//! this module only reads them.

use crate::error::CoreError;

/// Lifetime number of free generations per user.
pub const FREE_LIMIT: i32 = 3;

/// Known subscription status values as reported by the payment provider.
pub mod status {
    pub const ACTIVE: &str = "active";
    pub const PAST_DUE: &str = "past_due";
    pub const CANCELLED: &str = "cancelled";
}

/// The entitlement-relevant view of a user's usage record.
///
/// A missing usage row is represented by [`UsageSnapshot::default`]:
/// zero generations, unpaid.
#[derive(Debug, Clone, Default)]
pub struct UsageSnapshot {
    pub proposals_created: i32,
    pub is_paid: bool,
    pub subscription_status: Option<String>,
}

impl UsageSnapshot {
    /// A subscription counts only while the provider reports it active.
    ///
    /// `is_paid` may lag behind a lapsed subscription until the next
    /// provider event lands, so `past_due`/`cancelled` revoke unlimited
    /// generation even with `is_paid` still set.
    pub fn is_active_pro(&self) -> bool {
        self.is_paid && self.subscription_status.as_deref() == Some(status::ACTIVE)
    }

    /// Remaining free generations, zero for users at or over the cap.
    pub fn free_remaining(&self) -> i32 {
        (FREE_LIMIT - self.proposals_created).max(0)
    }
}

/// Decide whether a user may generate another proposal.
///
/// Active paid subscribers are always permitted. Everyone else is capped
/// at [`FREE_LIMIT`] lifetime generations.
pub fn check_allowance(usage: &UsageSnapshot) -> Result<(), CoreError> {
    if usage.is_active_pro() {
        return Ok(());
    }
    if usage.proposals_created >= FREE_LIMIT {
        return Err(CoreError::LimitExceeded {
            created: usage.proposals_created,
            limit: FREE_LIMIT,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
