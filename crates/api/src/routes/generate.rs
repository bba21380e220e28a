//! Route definitions for proposal generation and the usage view.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{generate, usage};
use crate::state::AppState;

/// Generation routes.
///
/// ```text
/// POST /generate -> generate
/// GET  /usage    -> get_usage
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate::generate))
        .route("/usage", get(usage::get_usage))
}
