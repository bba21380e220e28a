//! Intake-form assist endpoints.
//!
//! Two variants over the same cheap assist model: a streamed plain-text
//! completion for the project-description field, and a structured JSON
//! suggestion of the remaining form fields. Assist is ancillary -- with no
//! model credential configured it reports unavailability rather than
//! fabricating content.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use teian_core::parse::extract_json_object;
use teian_core::prompt::{BUDGET_BUCKETS, DURATION_BUCKETS};
use teian_llm::LlmClient;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Partial project metadata from the intake form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistRequest {
    #[serde(default)]
    pub project_title: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub current_description: Option<String>,
}

fn require_llm(state: &AppState) -> AppResult<&LlmClient> {
    state
        .llm
        .as_deref()
        .ok_or_else(|| AppError::Unavailable("AI assist is not available".into()))
}

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "（未入力）"
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// POST /assist/description -- streamed narrative completion
// ---------------------------------------------------------------------------

fn description_prompt(req: &AssistRequest) -> String {
    let tech = if req.tech_stack.is_empty() {
        "（未入力）".to_string()
    } else {
        req.tech_stack.join(", ")
    };

    let current = match req.current_description.as_deref() {
        Some(description) if !description.trim().is_empty() => {
            format!("現在の概要（これを元に改善してください）: {description}\n")
        }
        _ => String::new(),
    };

    format!(
        "フリーランスエンジニアの提案書に記載する「案件概要」を作成してください。
プロジェクトの背景・目的・課題・解決策・期待効果を含む、説得力のある概要を200〜300文字程度で作成してください。
箇条書きではなく自然なビジネス文章で記述してください。

プロジェクト名: {title}
クライアント名: {client}
技術スタック: {tech}
{current}
案件概要の本文のみを出力してください。タイトルや前置きは不要です。",
        title = or_unset(&req.project_title),
        client = or_unset(&req.client_name),
    )
}

/// POST /api/v1/assist/description
///
/// Relay the model's completion to the caller chunk-by-chunk, in original
/// order, as `text/plain`. Nothing is buffered beyond one SSE line; the
/// first byte goes out as soon as the model produces it.
pub async fn assist_description(
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> AppResult<Response> {
    let llm = require_llm(&state)?;
    let prompt = description_prompt(&req);

    let stream = llm.stream_assist(&prompt).await.map_err(|err| {
        tracing::error!(error = %err, "assist stream could not be started");
        AppError::Unavailable("AI assist is not available".into())
    })?;

    let body = Body::from_stream(stream.map_ok(Bytes::from));

    Response::builder()
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(body)
        .map_err(|e| AppError::InternalError(format!("response construction failed: {e}")))
}

// ---------------------------------------------------------------------------
// POST /assist/fields -- structured suggestions for missing fields
// ---------------------------------------------------------------------------

/// Suggested values for form fields the user has not filled in yet.
/// Every field is optional; unusable model output degrades to `None`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSuggestions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub your_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

impl FieldSuggestions {
    /// Drop suggestions that are not legal form values: bucket fields must
    /// be one of the known labels, the rate must be a positive number.
    fn sanitized(mut self) -> Self {
        if let Some(duration) = &self.duration {
            if !DURATION_BUCKETS.contains(&duration.as_str()) {
                self.duration = None;
            }
        }
        if let Some(budget) = &self.budget {
            if !BUDGET_BUCKETS.contains(&budget.as_str()) {
                self.budget = None;
            }
        }
        if let Some(rate) = self.hourly_rate {
            if !rate.is_finite() || rate <= 0.0 {
                self.hourly_rate = None;
            }
        }
        self
    }
}

fn fields_prompt(req: &AssistRequest) -> String {
    format!(
        "フリーランスエンジニアの案件情報から、未入力のフォーム項目の妥当な値を推定してください。
必ず以下のJSON形式のみで回答してください。

{{
  \"duration\": \"{durations}のいずれか\",
  \"budget\": \"{budgets}のいずれか\",
  \"yourRole\": \"担当役割の短い日本語表現\",
  \"hourlyRate\": 時給単価の数値（円）
}}

プロジェクト名: {title}
クライアント名: {client}
技術スタック: {tech}
案件概要: {description}",
        durations = DURATION_BUCKETS.join(" / "),
        budgets = BUDGET_BUCKETS.join(" / "),
        title = or_unset(&req.project_title),
        client = or_unset(&req.client_name),
        tech = if req.tech_stack.is_empty() {
            "（未入力）".to_string()
        } else {
            req.tech_stack.join(", ")
        },
        description = or_unset(req.current_description.as_deref().unwrap_or("")),
    )
}

/// POST /api/v1/assist/fields
///
/// Suggest values for several missing fields at once. Unrecoverable model
/// output yields an empty suggestion set rather than an error.
pub async fn assist_fields(
    State(state): State<AppState>,
    Json(req): Json<AssistRequest>,
) -> AppResult<impl IntoResponse> {
    let llm = require_llm(&state)?;
    let prompt = fields_prompt(&req);

    let suggestions = match llm.complete_assist(&prompt).await {
        Ok(text) => extract_json_object(&text)
            .and_then(|span| serde_json::from_str::<FieldSuggestions>(span).ok())
            .unwrap_or_default()
            .sanitized(),
        Err(err) => {
            tracing::warn!(error = %err, "field suggestion call failed");
            FieldSuggestions::default()
        }
    };

    Ok(Json(DataResponse { data: suggestions }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
