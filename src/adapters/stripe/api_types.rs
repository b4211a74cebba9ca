//! Stripe REST API objects consumed by the adapter.
//!
//! Only the fields this service reads are modeled; Stripe adds fields freely
//! and unknown ones are ignored.

use serde::{Deserialize, Serialize};

/// `checkout.session` object as returned by `POST /v1/checkout/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// Hosted checkout page. Null for embedded sessions.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub success_url: Option<String>,

    #[serde(default)]
    pub cancel_url: Option<String>,

    /// Session mode (payment, subscription, setup).
    #[serde(default)]
    pub mode: Option<String>,
}

/// Error envelope for non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeApiError,
}

/// Body of a Stripe API error.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    /// Error type (invalid_request_error, card_error, api_error, ...).
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    /// Request parameter the error relates to.
    #[serde(default)]
    pub param: Option<String>,
}

impl StripeApiError {
    /// Single-line description for logs and upstream error messages.
    pub fn describe(&self) -> String {
        let message = self.message.as_deref().unwrap_or("unknown error");
        match &self.param {
            Some(param) => format!("{} (param: {})", message, param),
            None => message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_response_ignoring_extra_fields() {
        let json = r#"{
            "id": "cs_test_a1",
            "object": "checkout.session",
            "mode": "payment",
            "payment_status": "unpaid",
            "url": "https://checkout.stripe.com/c/pay/cs_test_a1",
            "success_url": "https://shop.test/payments/success",
            "cancel_url": "https://shop.test/payments/cancel"
        }"#;

        let session: StripeCheckoutSession = serde_json::from_str(json).unwrap();

        assert_eq!(session.id, "cs_test_a1");
        assert_eq!(
            session.url.as_deref(),
            Some("https://checkout.stripe.com/c/pay/cs_test_a1")
        );
        assert_eq!(session.mode.as_deref(), Some("payment"));
    }

    #[test]
    fn null_url_parses_as_none() {
        let session: StripeCheckoutSession =
            serde_json::from_str(r#"{"id": "cs_1", "url": null}"#).unwrap();

        assert!(session.url.is_none());
        assert!(session.success_url.is_none());
    }

    #[test]
    fn error_description_includes_param() {
        let body = r#"{"error": {"type": "invalid_request_error", "message": "Invalid currency: xyz", "param": "line_items[0][price_data][currency]"}}"#;

        let parsed: StripeErrorResponse = serde_json::from_str(body).unwrap();

        assert_eq!(
            parsed.error.describe(),
            "Invalid currency: xyz (param: line_items[0][price_data][currency])"
        );
        assert_eq!(parsed.error.error_type.as_deref(), Some("invalid_request_error"));
    }
}
