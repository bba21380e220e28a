//! Route definitions for the `/proposals` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::proposals;
use crate::state::AppState;

/// Proposal routes mounted at `/proposals`.
///
/// ```text
/// GET    /           -> list_proposals
/// GET    /{id}       -> get_proposal
/// DELETE /{id}       -> delete_proposal
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/proposals", get(proposals::list_proposals))
        .route(
            "/proposals/{id}",
            get(proposals::get_proposal).delete(proposals::delete_proposal),
        )
}
