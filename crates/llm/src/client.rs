//! HTTP client for the hosted text-generation provider.
//!
//! [`LlmClient`] wraps the Messages API over [`reqwest`]: a blocking
//! (awaited) completion call for proposal generation and field suggestions,
//! and a streaming variant for the description-assist endpoint.

use std::time::Duration;

use futures::{Stream, StreamExt, TryStreamExt};

use crate::messages::{self, Message, MessagesRequest, MessagesResponse, SseLineBuffer};

/// Sentinel value left in env files by the setup template. Treated the same
/// as an absent credential.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// API version header value required by the provider.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model for proposal generation.
const DEFAULT_MODEL: &str = "claude-sonnet-4-6";

/// Default (cheaper, faster) model for the assist endpoints.
const DEFAULT_ASSIST_MODEL: &str = "claude-haiku-4-5-20251001";

/// Default output-length budget for proposal generation.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Output-length budget for assist completions.
pub const ASSIST_MAX_TOKENS: u32 = 1024;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Provider configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider API key.
    pub api_key: String,
    /// Model used for proposal generation.
    pub model: String,
    /// Model used for assist completions.
    pub assist_model: String,
    /// Output-length budget for proposal generation.
    pub max_tokens: u32,
    /// API base URL (overridable for tests/proxies).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load provider configuration from environment variables.
    ///
    /// Returns `None` when `ANTHROPIC_API_KEY` is unset, empty, or still the
    /// setup placeholder -- the service then runs in deterministic-fallback
    /// mode by design, not as an error.
    ///
    /// | Env Var             | Default                       |
    /// |---------------------|-------------------------------|
    /// | `ANTHROPIC_API_KEY` | -- (None when missing)        |
    /// | `LLM_MODEL`         | `claude-sonnet-4-6`           |
    /// | `LLM_ASSIST_MODEL`  | `claude-haiku-4-5-20251001`   |
    /// | `LLM_MAX_TOKENS`    | `4096`                        |
    /// | `LLM_BASE_URL`      | `https://api.anthropic.com`   |
    /// | `LLM_TIMEOUT_SECS`  | `60`                          |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").ok()?;
        if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
            return None;
        }

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let assist_model =
            std::env::var("LLM_ASSIST_MODEL").unwrap_or_else(|_| DEFAULT_ASSIST_MODEL.into());
        let max_tokens: u32 = std::env::var("LLM_MAX_TOKENS")
            .unwrap_or_else(|_| DEFAULT_MAX_TOKENS.to_string())
            .parse()
            .expect("LLM_MAX_TOKENS must be a valid u32");
        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com".into());
        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        Some(Self {
            api_key,
            model,
            assist_model,
            max_tokens,
            base_url,
            timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the text-generation provider layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response carried no usable text segment (e.g. a refusal or a
    /// non-text content block).
    #[error("Provider response contained no text content")]
    NonText,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the hosted text-generation provider.
pub struct LlmClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl LlmClient {
    /// Build a client from configuration. The per-request timeout bounds
    /// every call, including the generation call on the hot path.
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client construction cannot fail with static options");
        Self { config, client }
    }

    /// Build a client from the environment, if a real credential is set.
    pub fn from_env() -> Option<Self> {
        LlmConfig::from_env().map(Self::new)
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    /// Request a completion and require a single text segment back.
    ///
    /// Uses the generation model and the configured output-length budget.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.complete_with(
            &self.config.model,
            Some(system.to_string()),
            user.to_string(),
            self.config.max_tokens,
        )
        .await
    }

    /// Request a short assist completion with the cheaper assist model.
    pub async fn complete_assist(&self, prompt: &str) -> Result<String, LlmError> {
        self.complete_with(
            &self.config.assist_model,
            None,
            prompt.to_string(),
            ASSIST_MAX_TOKENS,
        )
        .await
    }

    async fn complete_with(
        &self,
        model: &str,
        system: Option<String>,
        user: String,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = MessagesRequest {
            model: model.to_string(),
            max_tokens,
            system,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
            stream: None,
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed.first_text().ok_or(LlmError::NonText)
    }

    /// Request a streaming assist completion.
    ///
    /// Returns a stream of text fragments in generation order. Fragments are
    /// decoded from the provider's SSE frames as they arrive; nothing is
    /// buffered beyond one incomplete line.
    pub async fn stream_assist(
        &self,
        prompt: &str,
    ) -> Result<impl Stream<Item = Result<String, LlmError>> + Send + 'static, LlmError> {
        let request = MessagesRequest {
            model: self.config.assist_model.clone(),
            max_tokens: ASSIST_MAX_TOKENS,
            system: None,
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
            stream: Some(true),
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let stream = response
            .bytes_stream()
            .map_err(LlmError::from)
            .scan(SseLineBuffer::new(), |buffer, chunk| {
                let fragments: Vec<Result<String, LlmError>> = match chunk {
                    Ok(bytes) => buffer
                        .push(&bytes)
                        .into_iter()
                        .filter_map(|data| messages::sse_text_delta(&data))
                        .map(Ok)
                        .collect(),
                    Err(err) => vec![Err(err)],
                };
                futures::future::ready(Some(futures::stream::iter(fragments)))
            })
            .flatten();

        Ok(stream)
    }
}
