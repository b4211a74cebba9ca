//! HTTP adapter for payment endpoints.
//!
//! Exposes the payments boundary via REST API:
//! - `POST /payments/create-payment-session` - Open a hosted checkout session
//! - `GET /payments/success` - Post-payment landing
//! - `GET /payments/cancel` - Abandoned-checkout landing
//! - `POST /payments/webhook` - Handle Stripe webhooks
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{PaymentsApiError, PaymentsAppState, STRIPE_SIGNATURE_HEADER};
pub use routes::{build_app, payments_router, payments_routes};
