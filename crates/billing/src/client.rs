//! REST client for the payment provider's checkout and billing-portal
//! session endpoints.
//!
//! The provider's API takes form-encoded bodies and authenticates with a
//! bearer secret key. Only the two session-creation calls the service
//! needs are wrapped here.

use serde::Deserialize;

/// Stripe API base URL.
const API_BASE: &str = "https://api.stripe.com";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Payment-provider configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (`sk_...`).
    pub secret_key: String,
    /// Price id of the subscription product (`price_...`).
    pub price_id: String,
    /// Webhook endpoint signing secret (`whsec_...`).
    pub webhook_secret: String,
    /// API base URL (overridable for tests).
    pub base_url: String,
}

impl StripeConfig {
    /// Load billing configuration from environment variables.
    ///
    /// Returns `None` when `STRIPE_SECRET_KEY` is unset or empty -- billing
    /// endpoints then report a configuration error instead of calling out.
    ///
    /// | Env Var                 | Required | Default                  |
    /// |-------------------------|----------|--------------------------|
    /// | `STRIPE_SECRET_KEY`     | **yes**  | --                       |
    /// | `STRIPE_PRICE_ID`       | **yes**  | --                       |
    /// | `STRIPE_WEBHOOK_SECRET` | **yes**  | --                       |
    /// | `STRIPE_BASE_URL`       | no       | `https://api.stripe.com` |
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY").ok().filter(|s| !s.is_empty())?;
        let price_id = std::env::var("STRIPE_PRICE_ID")
            .expect("STRIPE_PRICE_ID must be set when STRIPE_SECRET_KEY is");
        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .expect("STRIPE_WEBHOOK_SECRET must be set when STRIPE_SECRET_KEY is");
        let base_url = std::env::var("STRIPE_BASE_URL").unwrap_or_else(|_| API_BASE.into());

        Some(Self {
            secret_key,
            price_id,
            webhook_secret,
            base_url,
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the payment-provider REST layer.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// The HTTP request itself failed (network, DNS, TLS).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Stripe API error ({status}): {body}")]
    Api { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A created checkout or portal session; only the redirect URL matters.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub id: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the payment provider's session endpoints.
pub struct StripeClient {
    config: StripeConfig,
    client: reqwest::Client,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from the environment, if a secret key is configured.
    pub fn from_env() -> Option<Self> {
        StripeConfig::from_env().map(Self::new)
    }

    /// The webhook endpoint signing secret.
    pub fn webhook_secret(&self) -> &str {
        &self.config.webhook_secret
    }

    /// Create a subscription checkout session for a user.
    ///
    /// `success_url`/`cancel_url` must be derived from the configured
    /// application URL by the caller; this method never sees request
    /// headers. The user id rides along as metadata on both the session
    /// and the subscription so webhook events can be attributed.
    pub async fn create_checkout_session(
        &self,
        customer_email: &str,
        user_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<Session, StripeError> {
        let params: Vec<(&str, &str)> = vec![
            ("mode", "subscription"),
            ("payment_method_types[0]", "card"),
            ("line_items[0][price]", &self.config.price_id),
            ("line_items[0][quantity]", "1"),
            ("customer_email", customer_email),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("metadata[user_id]", user_id),
            ("subscription_data[metadata][user_id]", user_id),
        ];

        self.post_form("/v1/checkout/sessions", &params).await
    }

    /// Create a billing-portal session for an existing customer.
    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<Session, StripeError> {
        let params: Vec<(&str, &str)> = vec![
            ("customer", customer_id),
            ("return_url", return_url),
        ];

        self.post_form("/v1/billing_portal/sessions", &params).await
    }

    async fn post_form(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Session, StripeError> {
        let response = self
            .client
            .post(format!("{}{path}", self.config.base_url))
            .bearer_auth(&self.config.secret_key)
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
