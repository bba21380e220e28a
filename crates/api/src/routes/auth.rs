//! Route definitions for the auth-provider callback.

use axum::routing::get;
use axum::Router;

use crate::handlers::auth_callback;
use crate::state::AppState;

/// Auth routes (intended for root-level, NOT under `/api/v1`).
///
/// ```text
/// GET /auth/callback -> auth_callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/auth/callback", get(auth_callback::auth_callback))
}
