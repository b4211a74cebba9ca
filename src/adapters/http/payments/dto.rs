//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! The session request and result are domain values with camelCase serde
//! and are used directly; this module holds what only the HTTP layer needs.

use serde::Serialize;

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of the post-checkout redirect landing pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLandingResponse {
    pub ok: bool,
    pub message: String,
}

impl CheckoutLandingResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            message: "Payment successful".to_string(),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            ok: false,
            message: "Payment cancelled".to_string(),
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Offending request field, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}
