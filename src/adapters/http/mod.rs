//! HTTP adapters - REST API implementations.

pub mod payments;

pub use payments::{build_app, payments_router, PaymentsAppState};
