//! Resume-token handlers: park a pending proposal input across the login
//! redirect and restore it exactly once afterwards.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use teian_core::error::CoreError;
use teian_core::proposal::ProposalInput;
use teian_core::types::Timestamp;
use teian_db::repositories::DraftRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// The token handed back to the client for the redirect round-trip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftCreated {
    pub token: Uuid,
    pub expires_at: Timestamp,
}

/// POST /api/v1/drafts
///
/// Park a pending input. The body is shape-checked as a `ProposalInput`
/// but not semantically validated -- a draft may be half-filled.
pub async fn create_draft(
    State(state): State<AppState>,
    Json(input): Json<ProposalInput>,
) -> AppResult<impl IntoResponse> {
    let input_json = serde_json::to_value(&input)
        .map_err(|e| AppError::InternalError(format!("draft serialization failed: {e}")))?;

    let draft = DraftRepo::create(&state.pool, &input_json, state.config.draft_ttl_secs).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: DraftCreated {
                token: draft.token,
                expires_at: draft.expires_at,
            },
        }),
    ))
}

/// GET /api/v1/drafts/{token}
///
/// Redeem a resume token. Single-use: a second redemption, or a redemption
/// after expiry, reads as not-found.
pub async fn take_draft(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let draft = DraftRepo::take(&state.pool, token)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Draft",
            id: token,
        }))?;

    Ok(Json(DataResponse { data: draft.input }))
}
