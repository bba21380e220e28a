//! Route definitions for proposal drafts (resume tokens).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::drafts;
use crate::state::AppState;

/// Draft routes mounted at `/drafts`.
///
/// ```text
/// POST /drafts         -> create_draft
/// GET  /drafts/{token} -> take_draft (single use)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/drafts", post(drafts::create_draft))
        .route("/drafts/{token}", get(drafts::take_draft))
}
