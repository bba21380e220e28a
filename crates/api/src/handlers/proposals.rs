//! Handlers for the `/proposals` resource. All operations are scoped to
//! the authenticated owner.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use teian_core::error::CoreError;
use teian_db::repositories::ProposalRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{clamp_limit, clamp_offset, PaginationParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/proposals
///
/// List the caller's proposals, newest first.
pub async fn list_proposals(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, 50, 200);
    let offset = clamp_offset(params.offset);

    let proposals = ProposalRepo::list_for_user(&state.pool, user.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: proposals }))
}

/// GET /api/v1/proposals/{id}
///
/// Fetch one of the caller's proposals.
pub async fn get_proposal(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let proposal = ProposalRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Proposal",
            id,
        }))?;

    Ok(Json(DataResponse { data: proposal }))
}

/// DELETE /api/v1/proposals/{id}
///
/// Delete one of the caller's proposals. The compound (id, owner) match
/// means another user's proposal reads as not-found rather than forbidden,
/// leaking nothing about its existence.
pub async fn delete_proposal(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let deleted = ProposalRepo::delete_for_user(&state.pool, id, user.user_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Proposal",
            id,
        }));
    }

    tracing::info!(proposal_id = %id, user_id = %user.user_id, "Proposal deleted");

    Ok(StatusCode::NO_CONTENT)
}
