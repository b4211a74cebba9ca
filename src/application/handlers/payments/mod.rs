//! Payment handlers - checkout session creation and webhook processing.

mod create_payment_session;
mod handle_stripe_webhook;

pub use create_payment_session::{CheckoutRedirects, CreatePaymentSessionHandler};
pub use handle_stripe_webhook::{
    HandleStripeWebhookCommand, HandleStripeWebhookHandler, WebhookOutcome, WebhookReply,
    WebhookReplyBody,
};
