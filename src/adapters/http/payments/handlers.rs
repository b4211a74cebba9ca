//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to the application layer handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::payments::{
    CheckoutRedirects, CreatePaymentSessionHandler, HandleStripeWebhookCommand,
    HandleStripeWebhookHandler, WebhookReply,
};
use crate::domain::payment::{PaymentError, PaymentSessionRequest, StripeWebhookVerifier};
use crate::ports::{EventPublisher, PaymentProcessor};

use super::dto::{CheckoutLandingResponse, ErrorResponse, HealthResponse};

/// Header carrying the processor's webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; dependencies are Arc-wrapped.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub payment_processor: Arc<dyn PaymentProcessor>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub webhook_verifier: StripeWebhookVerifier,
    pub redirects: CheckoutRedirects,
}

impl PaymentsAppState {
    pub fn session_handler(&self) -> CreatePaymentSessionHandler {
        CreatePaymentSessionHandler::new(self.payment_processor.clone(), self.redirects.clone())
    }

    pub fn webhook_handler(&self) -> HandleStripeWebhookHandler {
        HandleStripeWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.event_publisher.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /payments/create-payment-session - Open a hosted checkout session
pub async fn create_payment_session(
    State(state): State<PaymentsAppState>,
    payload: Result<Json<PaymentSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let Json(request) = payload
        .map_err(|rejection| PaymentError::validation("body", rejection.body_text()))?;

    let result = state.session_handler().handle(request).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /payments/success - Redirect landing after payment
pub async fn payment_success() -> Json<CheckoutLandingResponse> {
    Json(CheckoutLandingResponse::success())
}

/// GET /payments/cancel - Redirect landing after abandoned checkout
pub async fn payment_cancel() -> Json<CheckoutLandingResponse> {
    Json(CheckoutLandingResponse::cancelled())
}

/// POST /payments/webhook - Handle Stripe webhook events
///
/// The body is taken as raw bytes; the signature covers the exact bytes sent.
pub async fn handle_stripe_webhook(
    State(state): State<PaymentsAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookReply {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let cmd = HandleStripeWebhookCommand {
        signature,
        payload: body.to_vec(),
    };

    state.webhook_handler().handle(cmd).await
}

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts payment errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentsApiError(PaymentError);

impl From<PaymentError> for PaymentsApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentsApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            PaymentError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(self.0.code(), message.clone()).with_field(field.clone()),
            ),
            PaymentError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(self.0.code(), "Failed to create payment session"),
            ),
        };
        (status, Json(body)).into_response()
    }
}
