//! Typed decoding of payment-provider webhook events.
//!
//! The event set the service reacts to is a closed enum; everything else is
//! an explicit [`BillingEvent::Ignored`] so an unhandled-but-relevant event
//! type shows up as a visible gap here rather than a silent string branch.

use serde::Deserialize;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Raw envelope
// ---------------------------------------------------------------------------

/// The provider's event envelope: id, type, and the affected object.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Decoded events
// ---------------------------------------------------------------------------

/// The entitlement-relevant events, decoded into the fields the
/// synchronizer actually needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    /// `checkout.session.completed` -- a user finished paying.
    CheckoutCompleted {
        user_id: Uuid,
        customer_id: String,
        subscription_id: String,
    },
    /// `customer.subscription.updated` -- subscription state changed.
    SubscriptionUpdated {
        customer_id: String,
        status: String,
    },
    /// `customer.subscription.deleted` -- subscription ended.
    SubscriptionDeleted { customer_id: String },
    /// `invoice.payment_failed` -- renewal payment bounced.
    PaymentFailed { customer_id: String },
    /// Any event type this service does not act on. Still recorded for
    /// idempotency and acknowledged.
    Ignored { event_type: String },
}

#[derive(Debug, Clone, Deserialize)]
struct CheckoutSessionObject {
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    subscription: Option<String>,
    #[serde(default)]
    metadata: Option<CheckoutMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct CheckoutMetadata {
    #[serde(default)]
    user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
struct SubscriptionObject {
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct InvoiceObject {
    #[serde(default)]
    customer: Option<String>,
}

impl BillingEvent {
    /// Decode an envelope into a typed event.
    ///
    /// Events of a known type that are missing the fields needed to act
    /// (no customer id, no user metadata) decode to [`Self::Ignored`]:
    /// there is nothing to apply, but the delivery is still acknowledged.
    pub fn from_envelope(envelope: &EventEnvelope) -> Self {
        let ignored = || BillingEvent::Ignored {
            event_type: envelope.event_type.clone(),
        };

        match envelope.event_type.as_str() {
            "checkout.session.completed" => {
                let Ok(object) =
                    serde_json::from_value::<CheckoutSessionObject>(envelope.data.object.clone())
                else {
                    return ignored();
                };
                match (
                    object.metadata.and_then(|m| m.user_id),
                    object.customer,
                    object.subscription,
                ) {
                    (Some(user_id), Some(customer_id), Some(subscription_id)) => {
                        BillingEvent::CheckoutCompleted {
                            user_id,
                            customer_id,
                            subscription_id,
                        }
                    }
                    _ => ignored(),
                }
            }
            "customer.subscription.updated" => {
                let Ok(object) =
                    serde_json::from_value::<SubscriptionObject>(envelope.data.object.clone())
                else {
                    return ignored();
                };
                match (object.customer, object.status) {
                    (Some(customer_id), Some(status)) => BillingEvent::SubscriptionUpdated {
                        customer_id,
                        status,
                    },
                    _ => ignored(),
                }
            }
            "customer.subscription.deleted" => {
                let Ok(object) =
                    serde_json::from_value::<SubscriptionObject>(envelope.data.object.clone())
                else {
                    return ignored();
                };
                match object.customer {
                    Some(customer_id) => BillingEvent::SubscriptionDeleted { customer_id },
                    None => ignored(),
                }
            }
            "invoice.payment_failed" => {
                let Ok(object) =
                    serde_json::from_value::<InvoiceObject>(envelope.data.object.clone())
                else {
                    return ignored();
                };
                match object.customer {
                    Some(customer_id) => BillingEvent::PaymentFailed { customer_id },
                    None => ignored(),
                }
            }
            _ => ignored(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
