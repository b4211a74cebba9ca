//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `payment` - Carts, checkout sessions, webhook verification and the
//!   `payment.succeeded` contract
pub mod payment;
