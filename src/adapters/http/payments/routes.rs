//! Axum router configuration for payment endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers::{
    create_payment_session, handle_stripe_webhook, health, payment_cancel, payment_success,
    PaymentsAppState,
};

/// Create the payments API router.
///
/// # Routes
///
/// - `POST /create-payment-session` - Open a hosted checkout session
/// - `GET /success` - Redirect landing after payment
/// - `GET /cancel` - Redirect landing after abandoned checkout
/// - `POST /webhook` - Handle Stripe webhooks (signature verified, raw body)
pub fn payments_routes() -> Router<PaymentsAppState> {
    Router::new()
        .route("/create-payment-session", post(create_payment_session))
        .route("/success", get(payment_success))
        .route("/cancel", get(payment_cancel))
        .route("/webhook", post(handle_stripe_webhook))
}

/// Create the service router: payment routes under `/payments`, plus `/health`.
pub fn payments_router() -> Router<PaymentsAppState> {
    Router::new()
        .nest("/payments", payments_routes())
        .route("/health", get(health))
}

/// Full application with middleware, ready to serve.
///
/// No middleware here reads or rewrites request bodies; the webhook
/// signature is computed over the bytes as received.
///
/// # Example
///
/// ```ignore
/// let app = build_app(app_state, Duration::from_secs(30));
/// axum::serve(listener, app).await?;
/// ```
pub fn build_app(state: PaymentsAppState, request_timeout: Duration) -> Router {
    payments_router()
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
