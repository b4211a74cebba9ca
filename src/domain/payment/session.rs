//! Hosted checkout session summary returned to callers.

use serde::{Deserialize, Serialize};

/// The three redirect targets of a created checkout session.
///
/// Deliberately carries nothing else from the processor response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionResult {
    /// Where the customer lands after abandoning checkout.
    pub cancel_url: String,

    /// Where the customer lands after paying.
    pub success_url: String,

    /// Entry point of the hosted checkout page.
    #[serde(rename = "url")]
    pub entry_url: String,
}
