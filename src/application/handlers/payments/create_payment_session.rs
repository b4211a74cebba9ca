//! CreatePaymentSessionHandler - Builds a hosted checkout session for a cart.

use std::sync::Arc;

use crate::domain::payment::{
    PaymentError, PaymentSessionRequest, PaymentSessionResult, ORDER_ID_METADATA_KEY,
};
use crate::ports::{CheckoutLineItem, CheckoutSessionParams, PaymentProcessor};

/// Redirect targets configured for every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirects {
    pub success_url: String,
    pub cancel_url: String,
}

/// Handler that turns a cart into a processor checkout session.
///
/// The order identifier is written into the payment intent metadata. That
/// metadata is the only way the later `charge.succeeded` webhook can be
/// tied back to the order.
pub struct CreatePaymentSessionHandler {
    processor: Arc<dyn PaymentProcessor>,
    redirects: CheckoutRedirects,
}

impl CreatePaymentSessionHandler {
    pub fn new(processor: Arc<dyn PaymentProcessor>, redirects: CheckoutRedirects) -> Self {
        Self {
            processor,
            redirects,
        }
    }

    pub async fn handle(
        &self,
        request: PaymentSessionRequest,
    ) -> Result<PaymentSessionResult, PaymentError> {
        // 1. Validate the cart before any network call
        request.validate()?;

        // 2. Map items to inline-priced line items, preserving order
        let line_items = request
            .items
            .iter()
            .map(|item| {
                Ok(CheckoutLineItem {
                    name: item.name.clone(),
                    unit_amount: item.unit_amount()?,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>, PaymentError>>()?;

        let params = CheckoutSessionParams {
            currency: request.normalized_currency(),
            line_items,
            payment_intent_metadata: vec![(
                ORDER_ID_METADATA_KEY.to_string(),
                request.order_id.clone(),
            )],
            success_url: self.redirects.success_url.clone(),
            cancel_url: self.redirects.cancel_url.clone(),
        };

        // 3. Create the session
        let session = self
            .processor
            .create_checkout_session(params)
            .await
            .map_err(|e| {
                tracing::error!(order_id = %request.order_id, error = %e, "Checkout session creation failed");
                PaymentError::upstream(e.to_string())
            })?;

        let entry_url = session
            .url
            .ok_or_else(|| PaymentError::upstream("checkout session has no url"))?;

        tracing::info!(
            order_id = %request.order_id,
            session_id = %session.id,
            items = request.items.len(),
            "Checkout session created"
        );

        // 4. Expose only the redirect targets
        Ok(PaymentSessionResult {
            cancel_url: session
                .cancel_url
                .unwrap_or_else(|| self.redirects.cancel_url.clone()),
            success_url: session
                .success_url
                .unwrap_or_else(|| self.redirects.success_url.clone()),
            entry_url,
        })
    }
}
