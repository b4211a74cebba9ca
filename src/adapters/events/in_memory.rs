//! In-memory event bus implementation for testing.
//!
//! Captures every published event for assertions. Nothing leaves the process.
//!
//! This adapter is for **testing and local runs only**. Production code
//! should use `RedisEventPublisher`.

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

use crate::ports::{EventPublisher, OutboundEvent, PublishError};

/// In-memory event bus for testing.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
///
/// bus.publish(OutboundEvent::payment_succeeded(&message)?).await?;
///
/// assert_eq!(bus.event_count(), 1);
/// assert!(bus.has_event("payment.succeeded"));
/// ```
pub struct InMemoryEventBus {
    published: RwLock<Vec<OutboundEvent>>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
        }
    }

    // === Test Helpers ===

    /// Returns all published events in publication order.
    pub fn published_events(&self) -> Vec<OutboundEvent> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns events published under a pattern.
    pub fn events_of_type(&self, pattern: &str) -> Vec<OutboundEvent> {
        self.published_events()
            .into_iter()
            .filter(|e| e.pattern == pattern)
            .collect()
    }

    /// Clears all published events (for test isolation).
    pub fn clear(&self) {
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Checks if any event with the pattern was published.
    pub fn has_event(&self, pattern: &str) -> bool {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.pattern == pattern)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: OutboundEvent) -> Result<(), PublishError> {
        tracing::debug!(pattern = %event.pattern, "Captured event in memory");
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}
