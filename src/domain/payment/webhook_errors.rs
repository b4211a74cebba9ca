//! Webhook error types for Stripe webhook handling.
//!
//! Every variant is a terminal rejection of the delivery. None of them are
//! retried here, and all map to `400 Bad Request` so the processor does not
//! keep resending a delivery that can never verify.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that reject an inbound webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// The `stripe-signature` header was absent.
    #[error("Missing stripe-signature header")]
    MissingSignature,

    /// The signature header could not be parsed.
    #[error("Unable to extract timestamp and signatures from header: {0}")]
    MalformedHeader(String),

    /// No v1 signature matched the expected HMAC.
    #[error("No signatures found matching the expected signature for payload")]
    InvalidSignature,

    /// Signed timestamp is older than the tolerance window.
    #[error("Timestamp outside the tolerance zone")]
    TimestampOutOfRange,

    /// Signed timestamp is too far in the future.
    #[error("Timestamp is in the future")]
    InvalidTimestamp,

    /// Payload verified but is not a well-formed event.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl WebhookError {
    /// Returns true if the processor should retry this delivery.
    ///
    /// A delivery that failed verification will fail again with the same
    /// signature, so nothing here is retryable.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Maps the error to the HTTP status returned to the processor.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Plain-text body returned to the processor.
    pub fn response_body(&self) -> String {
        format!("Webhook Error: {}", self)
    }
}
