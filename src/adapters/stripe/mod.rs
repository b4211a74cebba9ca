//! Stripe payment processor adapter.
//!
//! Implements the `PaymentProcessor` port for hosted checkout sessions.
//! Webhook signature verification needs no network access and lives in
//! `domain::payment::webhook_verifier`.
//!
//! # Security
//!
//! - The secret key is held as `secrecy::SecretString` and redacted from `Debug`
//! - Requests authenticate with HTTP basic auth over TLS

mod api_types;
mod stripe_adapter;

pub use api_types::{StripeApiError, StripeCheckoutSession, StripeErrorResponse};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter, DEFAULT_API_BASE_URL};
