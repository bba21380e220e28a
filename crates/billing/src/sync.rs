//! Subscription state synchronizer.
//!
//! Consumes verified webhook events and reconciles them into the
//! entitlement fields of `user_usage`. Never touched by the generation
//! path; the generation gate only reads what is written here.

use sqlx::PgPool;
use teian_db::repositories::{StripeEventRepo, UsageRepo};

use crate::event::BillingEvent;

/// What happened to a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// This delivery was processed and its effects applied.
    Applied,
    /// The event id was already recorded; nothing was re-applied.
    Duplicate,
}

/// Process one verified webhook delivery.
///
/// Record-then-process: the event id is inserted first, and losing that
/// insert to a concurrent or earlier delivery short-circuits before any
/// entitlement change, so at-least-once delivery can never double-apply.
/// Events that target an unknown customer are applied as no-ops and still
/// count as processed.
pub async fn process_event(
    pool: &PgPool,
    event_id: &str,
    event_type: &str,
    event: BillingEvent,
) -> Result<SyncOutcome, sqlx::Error> {
    let owns_processing = StripeEventRepo::try_record(pool, event_id, event_type).await?;
    if !owns_processing {
        tracing::info!(event_id, event_type, "duplicate webhook delivery skipped");
        return Ok(SyncOutcome::Duplicate);
    }

    apply_event(pool, &event).await?;

    tracing::info!(event_id, event_type, "webhook event applied");
    Ok(SyncOutcome::Applied)
}

/// Apply a decoded event's entitlement effects.
async fn apply_event(pool: &PgPool, event: &BillingEvent) -> Result<(), sqlx::Error> {
    match event {
        BillingEvent::CheckoutCompleted {
            user_id,
            customer_id,
            subscription_id,
        } => {
            UsageRepo::apply_checkout_completed(pool, *user_id, customer_id, subscription_id)
                .await?;
        }
        BillingEvent::SubscriptionUpdated {
            customer_id,
            status,
        } => {
            let matched = UsageRepo::apply_subscription_updated(pool, customer_id, status).await?;
            if !matched {
                tracing::warn!(%customer_id, "subscription update for unknown customer");
            }
        }
        BillingEvent::SubscriptionDeleted { customer_id } => {
            let matched = UsageRepo::apply_subscription_deleted(pool, customer_id).await?;
            if !matched {
                tracing::warn!(%customer_id, "subscription deletion for unknown customer");
            }
        }
        BillingEvent::PaymentFailed { customer_id } => {
            let matched = UsageRepo::apply_payment_failed(pool, customer_id).await?;
            if !matched {
                tracing::warn!(%customer_id, "payment failure for unknown customer");
            }
        }
        BillingEvent::Ignored { event_type } => {
            tracing::debug!(%event_type, "event type not handled");
        }
    }
    Ok(())
}
