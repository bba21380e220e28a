//! Row type for the `stripe_events` idempotency table.

use serde::Serialize;
use teian_core::types::Timestamp;

/// A payment-provider event that has been accepted for processing.
/// Existence of a row is what marks an event id as handled.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StripeEventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub created_at: Timestamp,
}
