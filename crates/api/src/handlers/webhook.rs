//! The payment-provider webhook endpoint.
//!
//! Signature verification happens against the raw request body before any
//! parsing. Duplicate deliveries are acknowledged with 2xx and skipped via
//! the `stripe_events` insert-is-the-lock record.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use teian_billing::event::EventEnvelope;
use teian_billing::signature::{verify_signature, DEFAULT_TOLERANCE_SECS};
use teian_billing::sync::{process_event, SyncOutcome};
use teian_billing::BillingEvent;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Acknowledgement payload. `skipped` marks a duplicate delivery.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub skipped: bool,
}

/// POST /api/v1/billing/webhook
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<impl IntoResponse> {
    let Some(stripe) = state.stripe.as_deref() else {
        return Err(AppError::Unavailable("Billing is not configured".into()));
    };

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing signature".into()))?;

    verify_signature(
        &body,
        signature,
        stripe.webhook_secret(),
        DEFAULT_TOLERANCE_SECS,
        Utc::now().timestamp(),
    )
    .map_err(|err| {
        tracing::warn!(error = %err, "Webhook signature verification failed");
        AppError::BadRequest("Invalid signature".into())
    })?;

    let envelope: serde_json::Result<EventEnvelope> = serde_json::from_str(&body);
    let envelope = envelope.map_err(|err| {
        tracing::warn!(error = %err, "Webhook payload did not parse");
        AppError::BadRequest("Invalid payload".into())
    })?;

    let event = BillingEvent::from_envelope(&envelope);
    let outcome = process_event(&state.pool, &envelope.id, &envelope.event_type, event).await?;

    Ok(Json(DataResponse {
        data: WebhookAck {
            received: true,
            skipped: outcome == SyncOutcome::Duplicate,
        },
    }))
}
