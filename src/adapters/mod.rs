//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - Event publishers (in-memory, Redis)
//! - `http` - Axum routes and handlers
//! - `stripe` - Stripe API client

pub mod events;
pub mod http;
pub mod stripe;

pub use events::{InMemoryEventBus, RedisEventPublisher, RedisPublisherConfig};
pub use http::{build_app, payments_router, PaymentsAppState};
pub use stripe::{StripeConfig, StripePaymentAdapter};
