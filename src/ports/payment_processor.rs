//! Payment processor port for hosted checkout.
//!
//! The processor is an opaque capability: this service only asks it to
//! open one-shot "payment" mode checkout sessions. Webhook verification is
//! local computation and lives in the domain.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for the payment processor's session API.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create a one-shot payment checkout session.
    ///
    /// Returns the processor's session summary, including the hosted page URL.
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionParams,
    ) -> Result<CreatedCheckoutSession, ProcessorError>;
}

/// Request to open a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionParams {
    /// Lowercase ISO currency code.
    pub currency: String,

    /// Line items in cart order.
    pub line_items: Vec<CheckoutLineItem>,

    /// Metadata attached to the payment intent, echoed back on its charges.
    pub payment_intent_metadata: Vec<(String, String)>,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,
}

/// One line item priced inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    pub name: String,

    /// Unit price in the smallest currency subunit.
    pub unit_amount: i64,

    pub quantity: u32,
}

/// Checkout session as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// Hosted checkout page; absent for embedded sessions.
    pub url: Option<String>,

    pub success_url: Option<String>,

    pub cancel_url: Option<String>,
}

/// Errors from payment processor operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorError {
    /// Error code for categorization.
    pub code: ProcessorErrorCode,

    /// Human-readable message.
    pub message: String,

    /// HTTP status returned by the processor, if any.
    pub status: Option<u16>,
}

impl ProcessorError {
    pub fn new(code: ProcessorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProcessorErrorCode::NetworkError, message)
    }

    /// Create an error from a non-success API response.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        let code = match status {
            401 | 403 => ProcessorErrorCode::AuthenticationError,
            400 | 402 | 404 => ProcessorErrorCode::InvalidRequest,
            429 => ProcessorErrorCode::RateLimitExceeded,
            _ => ProcessorErrorCode::ProviderError,
        };
        Self {
            code,
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create an error for a response that could not be understood.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProcessorErrorCode::InvalidResponse, message)
    }
}

impl std::fmt::Display for ProcessorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ProcessorError {}

/// Processor error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API key rejected.
    AuthenticationError,

    /// Request rejected (bad currency, bad amount, ...).
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Response body did not match the expected shape.
    InvalidResponse,

    /// Any other provider failure.
    ProviderError,
}

impl std::fmt::Display for ProcessorErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProcessorErrorCode::NetworkError => "network_error",
            ProcessorErrorCode::AuthenticationError => "authentication_error",
            ProcessorErrorCode::InvalidRequest => "invalid_request",
            ProcessorErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            ProcessorErrorCode::InvalidResponse => "invalid_response",
            ProcessorErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
