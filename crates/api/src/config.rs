use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `90`; must exceed the
    /// generation call's own timeout so degradation happens inside the
    /// handler, not at the HTTP layer).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Public application URL used to build billing return URLs and the
    /// post-login redirect origin. Never derived from request headers.
    pub app_url: String,
    /// Whether `/generate` requires an authenticated caller. When `false`
    /// (the default) anonymous callers may generate without persistence
    /// or quota.
    pub generate_requires_auth: bool,
    /// Lifetime of a parked proposal draft in seconds (default: `1800`).
    pub draft_ttl_secs: i64,
    /// Auth-provider endpoint for exchanging an authorization code for a
    /// session. Unset means the callback cannot complete an exchange.
    pub auth_token_url: Option<String>,
    /// JWT validation configuration (shared secret with the auth provider).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `90`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `APP_URL`                | `http://localhost:3000`    |
    /// | `GENERATE_REQUIRES_AUTH` | `false`                    |
    /// | `DRAFT_TTL_SECS`         | `1800`                     |
    /// | `AUTH_TOKEN_URL`         | unset                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let generate_requires_auth = std::env::var("GENERATE_REQUIRES_AUTH")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let draft_ttl_secs: i64 = std::env::var("DRAFT_TTL_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .expect("DRAFT_TTL_SECS must be a valid i64");

        let auth_token_url = std::env::var("AUTH_TOKEN_URL").ok().filter(|s| !s.is_empty());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            app_url,
            generate_requires_auth,
            draft_ttl_secs,
            auth_token_url,
            jwt,
        }
    }
}
