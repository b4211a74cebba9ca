//! Cart value objects submitted for checkout.
//!
//! Prices arrive as decimal currency amounts and are converted to the
//! processor's smallest currency subunit with round-half-away-from-zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::errors::PaymentError;

/// A single priced, quantified entry in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product name shown on the hosted checkout page.
    pub name: String,

    /// Unit price in major currency units (e.g. `19.99`).
    pub price: Decimal,

    /// Number of units, at least one.
    pub quantity: u32,
}

impl CartItem {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Unit price in the smallest currency subunit, `round(price * 100)`.
    ///
    /// Midpoints round away from zero, so `0.125` becomes `13`.
    pub fn unit_amount(&self) -> Result<i64, PaymentError> {
        to_minor_units(self.price)
    }

    fn validate(&self, index: usize) -> Result<(), PaymentError> {
        if self.name.trim().is_empty() {
            return Err(PaymentError::validation(
                format!("items[{}].name", index),
                "item name cannot be empty",
            ));
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(PaymentError::validation(
                format!("items[{}].price", index),
                "price cannot be negative",
            ));
        }
        if self.quantity == 0 {
            return Err(PaymentError::validation(
                format!("items[{}].quantity", index),
                "quantity must be at least 1",
            ));
        }
        self.unit_amount().map_err(|_| {
            PaymentError::validation(
                format!("items[{}].price", index),
                "price is too large",
            )
        })?;
        Ok(())
    }
}

/// Converts a major-unit amount into minor units (cents).
pub fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| PaymentError::validation("price", "amount out of range"))
}

/// A cart submitted for hosted checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    /// ISO 4217 currency code (case-insensitive).
    pub currency: String,

    /// Items in display order.
    pub items: Vec<CartItem>,

    /// Internal order identifier echoed back on the charge webhook.
    pub order_id: String,
}

impl PaymentSessionRequest {
    /// Checks the cart before any processor call is made.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Validation` if the currency is not a
    /// three-letter code, the cart is empty, or any item is malformed.
    pub fn validate(&self) -> Result<(), PaymentError> {
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PaymentError::validation(
                "currency",
                "currency must be a three-letter ISO code",
            ));
        }

        if self.items.is_empty() {
            return Err(PaymentError::validation(
                "items",
                "cart must contain at least one item",
            ));
        }

        for (index, item) in self.items.iter().enumerate() {
            item.validate(index)?;
        }

        Ok(())
    }

    /// Currency in the lowercase form the processor expects.
    pub fn normalized_currency(&self) -> String {
        self.currency.trim().to_ascii_lowercase()
    }
}
