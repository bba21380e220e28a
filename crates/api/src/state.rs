use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). The provider clients are `None` when their credentials are
/// not configured: generation then runs in deterministic-fallback mode and
/// billing endpoints report a configuration error.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: teian_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Text-generation provider client, when a credential is configured.
    pub llm: Option<Arc<teian_llm::LlmClient>>,
    /// Payment provider client, when a secret key is configured.
    pub stripe: Option<Arc<teian_billing::StripeClient>>,
    /// Shared HTTP client for the auth-provider code exchange.
    pub http: reqwest::Client,
}
