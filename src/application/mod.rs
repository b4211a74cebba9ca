//! Application layer - Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::payments::{
    CheckoutRedirects, CreatePaymentSessionHandler, HandleStripeWebhookCommand,
    HandleStripeWebhookHandler, WebhookOutcome, WebhookReply, WebhookReplyBody,
};
