//! Route definitions for billing sessions and the provider webhook.

use axum::routing::post;
use axum::Router;

use crate::handlers::{billing, webhook};
use crate::state::AppState;

/// Billing routes mounted at `/billing`.
///
/// ```text
/// POST /billing/checkout -> create_checkout (auth)
/// POST /billing/portal   -> create_portal (auth)
/// POST /billing/webhook  -> stripe_webhook (signature-verified)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/billing/checkout", post(billing::create_checkout))
        .route("/billing/portal", post(billing::create_portal))
        .route("/billing/webhook", post(webhook::stripe_webhook))
}
