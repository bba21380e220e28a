//! Checkout and billing-portal session endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use teian_billing::StripeClient;
use teian_core::error::CoreError;
use teian_db::repositories::UsageRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Redirect target returned by both session endpoints.
#[derive(Debug, Serialize)]
pub struct SessionUrl {
    pub url: String,
}

fn require_stripe(state: &AppState) -> AppResult<&StripeClient> {
    state
        .stripe
        .as_deref()
        .ok_or_else(|| AppError::Unavailable("Billing is not configured".into()))
}

/// POST /api/v1/billing/checkout
///
/// Create a subscription checkout session. Return URLs are derived from
/// the configured application URL only -- request headers (Host, Origin)
/// are never consulted, so a spoofed header cannot steer the redirect.
pub async fn create_checkout(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stripe = require_stripe(&state)?;

    let email = user.email.as_deref().ok_or_else(|| {
        AppError::BadRequest("Account has no email address on record".into())
    })?;

    let app_url = &state.config.app_url;
    let success_url = format!("{app_url}/dashboard?upgraded=true");
    let cancel_url = format!("{app_url}/dashboard");

    let session = stripe
        .create_checkout_session(email, &user.user_id.to_string(), &success_url, &cancel_url)
        .await?;

    tracing::info!(user_id = %user.user_id, session_id = %session.id, "Checkout session created");

    Ok(Json(DataResponse {
        data: SessionUrl { url: session.url },
    }))
}

/// POST /api/v1/billing/portal
///
/// Create a billing-portal session for an existing subscriber. Callers
/// with no recorded customer id have no subscription to manage.
pub async fn create_portal(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stripe = require_stripe(&state)?;

    let usage = UsageRepo::find_by_user(&state.pool, user.user_id).await?;
    let customer_id = usage
        .and_then(|u| u.stripe_customer_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: user.user_id,
        }))?;

    let return_url = format!("{}/dashboard", state.config.app_url);

    let session = stripe.create_portal_session(&customer_id, &return_url).await?;

    tracing::info!(user_id = %user.user_id, session_id = %session.id, "Portal session created");

    Ok(Json(DataResponse {
        data: SessionUrl { url: session.url },
    }))
}
