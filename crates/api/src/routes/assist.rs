//! Route definitions for the intake-form assist endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::assist;
use crate::state::AppState;

/// Assist routes mounted at `/assist`.
///
/// ```text
/// POST /assist/description -> assist_description (streamed text)
/// POST /assist/fields      -> assist_fields (structured JSON)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assist/description", post(assist::assist_description))
        .route("/assist/fields", post(assist::assist_fields))
}
