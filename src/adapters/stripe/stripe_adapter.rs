//! Stripe payment processor adapter.
//!
//! Implements the `PaymentProcessor` port against the Stripe REST API.
//! Requests are form-encoded with bracketed keys and authenticated with the
//! secret key as the HTTP basic-auth username.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    CheckoutSessionParams, CreatedCheckoutSession, PaymentProcessor, ProcessorError,
};

use super::api_types::{StripeCheckoutSession, StripeErrorResponse};

/// Default Stripe API origin.
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Stripe payment processor adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured client (timeouts, proxies).
    pub fn with_client(config: StripeConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

/// Flatten a session request into Stripe's bracketed form fields.
pub(crate) fn checkout_form(request: &CheckoutSessionParams) -> Vec<(String, String)> {
    let mut params = vec![("mode".to_string(), "payment".to_string())];

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{}]", i);
        params.push((
            format!("{}[price_data][currency]", prefix),
            request.currency.clone(),
        ));
        params.push((
            format!("{}[price_data][product_data][name]", prefix),
            item.name.clone(),
        ));
        params.push((
            format!("{}[price_data][unit_amount]", prefix),
            item.unit_amount.to_string(),
        ));
        params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
    }

    for (key, value) in &request.payment_intent_metadata {
        params.push((
            format!("payment_intent_data[metadata][{}]", key),
            value.clone(),
        ));
    }

    params.push(("success_url".to_string(), request.success_url.clone()));
    params.push(("cancel_url".to_string(), request.cancel_url.clone()));
    params
}

#[async_trait]
impl PaymentProcessor for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionParams,
    ) -> Result<CreatedCheckoutSession, ProcessorError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = checkout_form(&request);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProcessorError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorResponse>(&error_text)
                .map(|parsed| parsed.error.describe())
                .unwrap_or_else(|_| format!("Stripe API error: {}", error_text));
            tracing::error!(status = status.as_u16(), error = %message, "Stripe create_checkout_session failed");
            return Err(ProcessorError::api(status.as_u16(), message));
        }

        let stripe_session: StripeCheckoutSession = response.json().await.map_err(|e| {
            ProcessorError::invalid_response(format!("Failed to parse Stripe response: {}", e))
        })?;

        tracing::debug!(session_id = %stripe_session.id, "Stripe checkout session created");

        Ok(CreatedCheckoutSession {
            id: stripe_session.id,
            url: stripe_session.url,
            success_url: stripe_session.success_url,
            cancel_url: stripe_session.cancel_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{CheckoutLineItem, ProcessorErrorCode};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter_for(server: &MockServer) -> StripePaymentAdapter {
        let config = StripeConfig::new(SecretString::new("sk_test_key".to_string()))
            .with_base_url(server.uri());
        StripePaymentAdapter::new(config)
    }

    fn request() -> CheckoutSessionParams {
        CheckoutSessionParams {
            currency: "usd".to_string(),
            line_items: vec![
                CheckoutLineItem {
                    name: "Blue Shirt".to_string(),
                    unit_amount: 1999,
                    quantity: 2,
                },
                CheckoutLineItem {
                    name: "Socks".to_string(),
                    unit_amount: 500,
                    quantity: 1,
                },
            ],
            payment_intent_metadata: vec![("orderId".to_string(), "ORD-1".to_string())],
            success_url: "https://shop.test/payments/success".to_string(),
            cancel_url: "https://shop.test/payments/cancel".to_string(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Form Encoding Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn checkout_form_uses_bracketed_keys_in_cart_order() {
        let form = checkout_form(&request());
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("line_items[0][price_data][currency]"), Some("usd"));
        assert_eq!(
            get("line_items[0][price_data][product_data][name]"),
            Some("Blue Shirt")
        );
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("1999"));
        assert_eq!(get("line_items[0][quantity]"), Some("2"));
        assert_eq!(
            get("line_items[1][price_data][product_data][name]"),
            Some("Socks")
        );
        assert_eq!(get("payment_intent_data[metadata][orderId]"), Some("ORD-1"));
        assert_eq!(get("success_url"), Some("https://shop.test/payments/success"));
        assert_eq!(get("cancel_url"), Some("https://shop.test/payments/cancel"));
    }

    #[test]
    fn config_debug_redacts_api_key() {
        let config = StripeConfig::new(SecretString::new("sk_test_secret".to_string()));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk_test_secret"));
        assert!(debug.contains("https://api.stripe.com"));
    }

    #[test]
    fn with_base_url_trims_trailing_slash() {
        let config = StripeConfig::new(SecretString::new("sk_test".to_string()))
            .with_base_url("http://localhost:12111/");
        assert_eq!(config.api_base_url, "http://localhost:12111");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // API Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_session_with_form_body_and_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header_exists("authorization"))
            .and(body_string_contains("mode=payment"))
            .and(body_string_contains(
                "line_items%5B0%5D%5Bprice_data%5D%5Bunit_amount%5D=1999",
            ))
            .and(body_string_contains(
                "payment_intent_data%5Bmetadata%5D%5BorderId%5D=ORD-1",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_123",
                "object": "checkout.session",
                "url": "https://checkout.stripe.com/c/pay/cs_test_123",
                "success_url": "https://shop.test/payments/success",
                "cancel_url": "https://shop.test/payments/cancel"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = adapter_for(&server)
            .create_checkout_session(request())
            .await
            .unwrap();

        assert_eq!(session.id, "cs_test_123");
        assert_eq!(
            session.url.as_deref(),
            Some("https://checkout.stripe.com/c/pay/cs_test_123")
        );
        assert_eq!(
            session.cancel_url.as_deref(),
            Some("https://shop.test/payments/cancel")
        );
    }

    #[tokio::test]
    async fn stripe_error_body_becomes_processor_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "message": "Invalid currency: xyz",
                    "param": "line_items[0][price_data][currency]"
                }
            })))
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .create_checkout_session(request())
            .await
            .unwrap_err();

        assert_eq!(err.code, ProcessorErrorCode::InvalidRequest);
        assert_eq!(err.status, Some(400));
        assert!(err.message.contains("Invalid currency: xyz"));
    }

    #[tokio::test]
    async fn rejected_key_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .create_checkout_session(request())
            .await
            .unwrap_err();

        assert_eq!(err.code, ProcessorErrorCode::AuthenticationError);
        assert!(err.message.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn unparseable_success_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .create_checkout_session(request())
            .await
            .unwrap_err();

        assert_eq!(err.code, ProcessorErrorCode::InvalidResponse);
    }

    #[tokio::test]
    async fn unreachable_api_is_network_error() {
        let config = StripeConfig::new(SecretString::new("sk_test".to_string()))
            .with_base_url("http://127.0.0.1:1");
        let adapter = StripePaymentAdapter::new(config);

        let err = adapter.create_checkout_session(request()).await.unwrap_err();

        assert_eq!(err.code, ProcessorErrorCode::NetworkError);
    }
}
