//! Stripe webhook event types.
//!
//! `StripeEvent` is the raw envelope as delivered. `VerifiedEvent` is the
//! closed set of event kinds this service acts on, with a catch-all for
//! everything else so dispatch stays exhaustive.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::events::PaymentSucceeded;

/// Metadata key carrying the internal order identifier.
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

/// Stripe webhook event envelope (simplified).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "charge.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

/// The fields of a Stripe Charge object that matter downstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCharge {
    /// Charge identifier (ch_xxx format).
    pub id: String,

    /// Metadata copied from the payment intent at session creation.
    /// Stripe may send `null` as well as omitting it.
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,

    /// Hosted receipt page, absent until the charge is finalized.
    #[serde(default)]
    pub receipt_url: Option<String>,
}

impl StripeCharge {
    /// Order identifier set through `payment_intent_data.metadata`.
    pub fn order_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get(ORDER_ID_METADATA_KEY)
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// Known Stripe event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// A charge was captured successfully.
    ChargeSucceeded,
    /// Anything this service does not act on.
    Unknown,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "charge.succeeded" => Self::ChargeSucceeded,
            _ => Self::Unknown,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChargeSucceeded => "charge.succeeded",
            Self::Unknown => "unknown",
        }
    }
}

/// Data extracted from a `charge.succeeded` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeSucceeded {
    pub charge_id: String,
    pub order_id: Option<String>,
    pub receipt_url: Option<String>,
}

impl From<ChargeSucceeded> for PaymentSucceeded {
    fn from(charge: ChargeSucceeded) -> Self {
        PaymentSucceeded {
            stripe_payment_id: charge.charge_id,
            order_id: charge.order_id,
            receipt_url: charge.receipt_url,
        }
    }
}

/// A signature-verified event, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifiedEvent {
    /// `charge.succeeded`.
    ChargeSucceeded(ChargeSucceeded),

    /// Any other event type; acknowledged without action.
    Unrecognized { event_id: String, event_type: String },

    /// A `charge.succeeded` whose object is not a readable charge.
    /// Still acknowledged; there is nothing to emit.
    UnreadableCharge { event_id: String, reason: String },
}

impl VerifiedEvent {
    /// Interprets a verified envelope. A charge object that does not parse
    /// comes back as `UnreadableCharge` rather than an error.
    pub fn from_stripe_event(event: &StripeEvent) -> Self {
        match event.parsed_type() {
            StripeEventType::ChargeSucceeded => match event.deserialize_object::<StripeCharge>() {
                Ok(charge) => VerifiedEvent::ChargeSucceeded(ChargeSucceeded {
                    order_id: charge.order_id().map(str::to_string),
                    charge_id: charge.id,
                    receipt_url: charge.receipt_url,
                }),
                Err(e) => VerifiedEvent::UnreadableCharge {
                    event_id: event.id.clone(),
                    reason: e.to_string(),
                },
            },
            StripeEventType::Unknown => VerifiedEvent::Unrecognized {
                event_id: event.id.clone(),
                event_type: event.event_type.clone(),
            },
        }
    }
}

impl StripeEvent {
    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::parse(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }
}
