//! Payments Gateway - Stripe checkout sessions and payment webhooks
//!
//! This crate opens hosted checkout sessions for carts and turns verified
//! `charge.succeeded` webhooks into `payment.succeeded` events for the
//! order service.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
