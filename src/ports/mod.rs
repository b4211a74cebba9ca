//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProcessor` - Hosted checkout session creation
//! - `EventPublisher` - Fire-and-forget emission of downstream events

mod event_publisher;
mod payment_processor;

pub use event_publisher::{EventPublisher, OutboundEvent, PublishError};
pub use payment_processor::{
    CheckoutLineItem, CheckoutSessionParams, CreatedCheckoutSession, PaymentProcessor,
    ProcessorError, ProcessorErrorCode,
};
