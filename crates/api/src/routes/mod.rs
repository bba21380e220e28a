pub mod assist;
pub mod auth;
pub mod billing;
pub mod drafts;
pub mod generate;
pub mod health;
pub mod proposals;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate                 POST   generate a proposal (optionally authed)
///
/// /proposals                GET    list own proposals
/// /proposals/{id}           GET    fetch own proposal
/// /proposals/{id}           DELETE delete own proposal
///
/// /usage                    GET    quota/entitlement view
///
/// /assist/description       POST   streamed description completion
/// /assist/fields            POST   structured field suggestions
///
/// /billing/checkout         POST   create checkout session (auth)
/// /billing/portal           POST   create billing-portal session (auth)
/// /billing/webhook          POST   payment-provider webhook (signed)
///
/// /drafts                   POST   park a pending input
/// /drafts/{token}           GET    redeem a resume token (single use)
/// ```
///
/// `/health` and `/auth/callback` are mounted at the root, outside this
/// tree.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(generate::router())
        .merge(proposals::router())
        .merge(assist::router())
        .merge(billing::router())
        .merge(drafts::router())
}
