//! Shared test harness: builds the full application router with the same
//! middleware stack as `main.rs` so integration tests exercise what
//! production runs.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use teian_api::auth::jwt::{Claims, JwtConfig};
use teian_api::config::ServerConfig;
use teian_api::routes;
use teian_api::state::AppState;
use teian_billing::{StripeClient, StripeConfig};
use uuid::Uuid;

/// JWT secret shared by the test config and the token factory.
pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Webhook signing secret used by webhook tests.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        app_url: "http://localhost:3000".to_string(),
        generate_requires_auth: false,
        draft_ttl_secs: 1800,
        auth_token_url: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

/// Build the application router with no provider clients configured:
/// generation runs in deterministic-fallback mode, billing reports 503.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, None)
}

/// Build the application router with a billing client whose webhook secret
/// is [`TEST_WEBHOOK_SECRET`]. No outbound billing call is made by the
/// webhook path, so the dummy API key is never used.
pub fn build_test_app_with_stripe(pool: PgPool) -> Router {
    let stripe = StripeClient::new(StripeConfig {
        secret_key: "sk_test_dummy".to_string(),
        price_id: "price_test_dummy".to_string(),
        webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
        base_url: "http://localhost:9".to_string(),
    });
    build_app(pool, Some(Arc::new(stripe)))
}

fn build_app(pool: PgPool, stripe: Option<Arc<StripeClient>>) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
        llm: None,
        stripe,
        http: reqwest::Client::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Auth helpers
// ---------------------------------------------------------------------------

/// Mint a provider-style access token for a test user.
pub fn bearer_token(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id,
        email: Some(format!("{user_id}@example.com")),
        exp: chrono::Utc::now().timestamp() + 600,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token encoding should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_authed(app: Router, uri: &str, user_id: Uuid) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", bearer_token(user_id)))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a JSON POST request, optionally authenticated.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
    user: Option<Uuid>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(user_id) = user {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", bearer_token(user_id)));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request with a bearer token.
pub async fn delete_authed(app: Router, uri: &str, user_id: Uuid) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", bearer_token(user_id)))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid generation request body.
pub fn sample_input() -> serde_json::Value {
    serde_json::json!({
        "projectTitle": "ECサイトリニューアル",
        "clientName": "株式会社テスト",
        "projectDescription": "既存ECサイトの全面リニューアル",
        "techStack": ["Next.js", "PostgreSQL"],
        "duration": "3ヶ月",
        "budget": "〜100万",
        "yourName": "山田太郎",
        "yourRole": "フルスタックエンジニア",
        "hourlyRate": 5000.0
    })
}
