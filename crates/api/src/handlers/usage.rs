//! Handler for the caller's usage/entitlement view.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use teian_core::entitlement::FREE_LIMIT;
use teian_db::repositories::UsageRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// What the dashboard needs to render quota state and the upgrade prompt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageView {
    pub proposals_created: i32,
    pub free_limit: i32,
    pub free_remaining: i32,
    pub is_paid: bool,
    pub subscription_status: Option<String>,
    pub is_active_pro: bool,
}

/// GET /api/v1/usage
pub async fn get_usage(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let usage = UsageRepo::find_by_user(&state.pool, user.user_id).await?;
    let snapshot = usage.map(|u| u.snapshot()).unwrap_or_default();

    Ok(Json(DataResponse {
        data: UsageView {
            proposals_created: snapshot.proposals_created,
            free_limit: FREE_LIMIT,
            free_remaining: snapshot.free_remaining(),
            is_paid: snapshot.is_paid,
            is_active_pro: snapshot.is_active_pro(),
            subscription_status: snapshot.subscription_status,
        },
    }))
}
