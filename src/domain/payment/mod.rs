//! Payment domain - carts, checkout sessions, and Stripe webhook events.

mod cart;
mod errors;
mod events;
mod session;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use cart::{to_minor_units, CartItem, PaymentSessionRequest};
pub use errors::PaymentError;
pub use events::{PaymentSucceeded, PAYMENT_SUCCEEDED};
pub use session::PaymentSessionResult;
pub use stripe_event::{
    ChargeSucceeded, StripeCharge, StripeEvent, StripeEventData, StripeEventType, VerifiedEvent,
    ORDER_ID_METADATA_KEY,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier, DEFAULT_TOLERANCE_SECS};
