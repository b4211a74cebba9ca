//! EventPublisher port - Interface for emitting events to other services.
//!
//! This port defines how payment events leave the service without knowing
//! about the underlying transport (Redis pub/sub, in-memory, etc.).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::payment::{PaymentSucceeded, PAYMENT_SUCCEEDED};

/// Port for emitting events downstream.
///
/// Implementations must ensure:
/// - `publish` does not wait on network delivery (enqueue semantics)
/// - Delivery is at-least-once; consumers may see duplicates
/// - Transient transport failures are retried by the implementation
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hand an event to the transport.
    async fn publish(&self, event: OutboundEvent) -> Result<(), PublishError>;
}

/// An event addressed by pattern, as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEvent {
    /// Routing pattern, also used as the channel name.
    pub pattern: String,

    /// Event payload.
    pub data: serde_json::Value,
}

impl OutboundEvent {
    /// Build an event from any serializable payload.
    pub fn new(pattern: impl Into<String>, data: &impl Serialize) -> Result<Self, PublishError> {
        Ok(Self {
            pattern: pattern.into(),
            data: serde_json::to_value(data)
                .map_err(|e| PublishError::Serialization(e.to_string()))?,
        })
    }

    /// `payment.succeeded` event.
    pub fn payment_succeeded(message: &PaymentSucceeded) -> Result<Self, PublishError> {
        Self::new(PAYMENT_SUCCEEDED, message)
    }

    /// Wire encoding: `{"pattern": ..., "data": ...}`.
    pub fn to_json(&self) -> Result<String, PublishError> {
        serde_json::to_string(self).map_err(|e| PublishError::Serialization(e.to_string()))
    }
}

/// Errors raised when handing an event to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("Publish queue is full")]
    QueueFull,

    #[error("Publisher has shut down")]
    Closed,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
