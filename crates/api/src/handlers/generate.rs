//! The proposal generation endpoint.
//!
//! Fixed per-request order: entitlement check, generation, proposal insert,
//! counter increment. The generation step itself never fails (it degrades
//! to the deterministic estimate); failures after it are persistence
//! faults and surface as errors.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use teian_core::entitlement;
use teian_core::error::CoreError;
use teian_core::proposal::{ProposalInput, ProposalOutput};
use teian_db::repositories::{ProposalRepo, UsageRepo};
use teian_llm::generate_proposal;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload: the generated document, plus the persisted row id for
/// authenticated callers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<Uuid>,
    pub output: ProposalOutput,
}

/// POST /api/v1/generate
///
/// Generate a proposal from a structured brief. Authenticated callers are
/// quota-gated and get the result persisted; anonymous callers (when the
/// deployment permits them) generate ephemerally.
pub async fn generate(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<AppState>,
    Json(input): Json<ProposalInput>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    match user {
        Some(user) => generate_for_user(&state, user, input).await,
        None if state.config.generate_requires_auth => Err(AppError::Core(
            CoreError::Unauthorized("Sign in to generate proposals".into()),
        )),
        None => {
            let output = generate_proposal(state.llm.as_deref(), &input).await;
            Ok(Json(DataResponse {
                data: GenerateResponse {
                    proposal_id: None,
                    output,
                },
            }))
        }
    }
}

async fn generate_for_user(
    state: &AppState,
    user: AuthUser,
    input: ProposalInput,
) -> AppResult<Json<DataResponse<GenerateResponse>>> {
    // 1. Entitlement gate, before any model call.
    let usage = UsageRepo::find_by_user(&state.pool, user.user_id).await?;
    let snapshot = usage.map(|u| u.snapshot()).unwrap_or_default();
    entitlement::check_allowance(&snapshot)?;

    // 2. Generation (total; degrades internally).
    let output = generate_proposal(state.llm.as_deref(), &input).await;

    // 3. Persist the proposal. A failure here must surface: the caller is
    //    not told "saved" for a document that was not.
    let input_json = serde_json::to_value(&input)
        .map_err(|e| AppError::InternalError(format!("input serialization failed: {e}")))?;
    let output_json = serde_json::to_value(&output)
        .map_err(|e| AppError::InternalError(format!("output serialization failed: {e}")))?;

    let proposal =
        ProposalRepo::create(&state.pool, user.user_id, &input_json, &output_json).await?;

    // 4. Advance the lifetime counter. A failure after the insert is a
    //    tolerated under-count, logged but not surfaced.
    match UsageRepo::record_generation(&state.pool, user.user_id).await {
        Ok(updated) => {
            tracing::info!(
                user_id = %user.user_id,
                proposal_id = %proposal.id,
                proposals_created = updated.proposals_created,
                "Proposal generated",
            );
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                user_id = %user.user_id,
                proposal_id = %proposal.id,
                "Usage counter increment failed after proposal insert",
            );
        }
    }

    Ok(Json(DataResponse {
        data: GenerateResponse {
            proposal_id: Some(proposal.id),
            output,
        },
    }))
}
