//! Downstream payment events.
//!
//! `PaymentSucceeded` is consumed by other services; its field names are a
//! public contract and must not change.

use serde::{Deserialize, Serialize};

/// Pattern under which successful payments are emitted.
pub const PAYMENT_SUCCEEDED: &str = "payment.succeeded";

/// A charge completed for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    /// Processor charge identifier (`ch_...`).
    pub stripe_payment_id: String,

    /// Order identifier recovered from charge metadata, if the session set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Hosted receipt page for the charge.
    pub receipt_url: Option<String>,
}
