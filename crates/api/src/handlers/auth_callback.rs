//! Auth-provider callback: code-for-session exchange and post-login
//! redirect.
//!
//! The redirect target is caller-supplied and therefore sanitized to a
//! relative same-origin path; the session cookie is HttpOnly. The exchange
//! itself is a thin call to the provider's token endpoint.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use teian_core::redirect::sanitize_next_path;

use crate::state::AppState;

/// Where the user lands when the code exchange fails.
const LOGIN_ERROR_PATH: &str = "/auth/login?error=auth_failed";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionTokens {
    access_token: String,
}

/// GET /auth/callback
///
/// Exchange the authorization code for a session, set the session cookie,
/// and redirect to the sanitized `next` path. Without a code the redirect
/// still happens (the page handles its own signed-out state).
pub async fn auth_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let next = sanitize_next_path(params.next.as_deref().unwrap_or("")).to_string();

    let Some(code) = params.code else {
        return Redirect::to(&next).into_response();
    };

    match exchange_code(&state, &code).await {
        Ok(tokens) => {
            let mut response = Redirect::to(&next).into_response();
            let cookie = format!(
                "session={}; Path=/; HttpOnly; SameSite=Lax",
                tokens.access_token
            );
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(err) => {
                    tracing::error!(error = %err, "Session cookie could not be encoded");
                    return Redirect::to(LOGIN_ERROR_PATH).into_response();
                }
            }
            response
        }
        Err(err) => {
            tracing::error!(error = %err, "Authorization code exchange failed");
            Redirect::to(LOGIN_ERROR_PATH).into_response()
        }
    }
}

/// Exchange an authorization code at the provider's token endpoint.
async fn exchange_code(state: &AppState, code: &str) -> Result<SessionTokens, String> {
    let token_url = state
        .config
        .auth_token_url
        .as_deref()
        .ok_or_else(|| "AUTH_TOKEN_URL is not configured".to_string())?;

    let response = state
        .http
        .post(token_url)
        .form(&[("grant_type", "authorization_code"), ("code", code)])
        .send()
        .await
        .map_err(|e| format!("token request failed: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("token endpoint returned {status}"));
    }

    response
        .json::<SessionTokens>()
        .await
        .map_err(|e| format!("token response did not parse: {e}"))
}
