//! Shared fixtures for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use secrecy::SecretString;
use tower::ServiceExt;
use wiremock::MockServer;

use payments_gateway::adapters::events::InMemoryEventBus;
use payments_gateway::adapters::http::{build_app, PaymentsAppState};
use payments_gateway::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use payments_gateway::application::CheckoutRedirects;
use payments_gateway::domain::payment::StripeWebhookVerifier;

pub const ENDPOINT_SECRET: &str = "whsec_integration_secret";
pub const SUCCESS_URL: &str = "https://shop.test/payments/success";
pub const CANCEL_URL: &str = "https://shop.test/payments/cancel";

/// Router wired to a mock Stripe API and an in-memory event bus.
pub struct TestApp {
    pub router: Router,
    pub bus: Arc<InMemoryEventBus>,
}

impl TestApp {
    pub fn new(stripe: &MockServer) -> Self {
        Self::with_stripe_url(&stripe.uri())
    }

    /// For tests that never reach Stripe.
    pub fn offline() -> Self {
        Self::with_stripe_url("http://127.0.0.1:1")
    }

    fn with_stripe_url(stripe_url: &str) -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        let stripe_config = StripeConfig::new(SecretString::new("sk_test_integration".to_string()))
            .with_base_url(stripe_url);

        let state = PaymentsAppState {
            payment_processor: Arc::new(StripePaymentAdapter::new(stripe_config)),
            event_publisher: bus.clone(),
            webhook_verifier: StripeWebhookVerifier::new(SecretString::new(
                ENDPOINT_SECRET.to_string(),
            )),
            redirects: CheckoutRedirects {
                success_url: SUCCESS_URL.to_string(),
                cancel_url: CANCEL_URL.to_string(),
            },
        };

        Self {
            router: build_app(state, Duration::from_secs(10)),
            bus,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
