//! Payment session error types.

use thiserror::Error;

/// Errors raised while building a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// The cart was rejected before contacting the processor.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// The payment processor call failed (network, auth, bad currency, ...).
    #[error("Payment processor error: {0}")]
    Upstream(String),
}

impl PaymentError {
    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an upstream processor error.
    pub fn upstream(message: impl Into<String>) -> Self {
        PaymentError::Upstream(message.into())
    }

    /// Machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            PaymentError::Validation { .. } => "VALIDATION_FAILED",
            PaymentError::Upstream(_) => "PAYMENT_PROVIDER_ERROR",
        }
    }

    /// Returns true if the caller, not the processor, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PaymentError::Validation { .. })
    }
}
