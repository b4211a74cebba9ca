//! HandleStripeWebhookHandler - Verifies processor callbacks and emits `payment.succeeded`.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::payment::{
    PaymentSucceeded, StripeWebhookVerifier, VerifiedEvent, WebhookError,
};
use crate::ports::{EventPublisher, OutboundEvent};

/// Inbound webhook delivery, exactly as received.
#[derive(Debug, Clone)]
pub struct HandleStripeWebhookCommand {
    /// Raw `stripe-signature` header value, if present.
    pub signature: Option<String>,
    /// Unmodified request body.
    pub payload: Vec<u8>,
}

/// What happened to a verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// `charge.succeeded` was handed to the emitter.
    Dispatched(PaymentSucceeded),
    /// Event type has no downstream meaning; acknowledged only.
    Ignored { event_type: String },
    /// `charge.succeeded` with an object that is not a charge; acknowledged only.
    Unreadable { event_id: String },
}

/// Body of a webhook response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookReplyBody {
    /// `{"sig": "<raw header>"}`
    Acknowledged { sig: String },
    /// `Webhook Error: <message>` as plain text.
    Rejected(String),
}

/// Status and body returned to the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookReply {
    pub status: StatusCode,
    pub body: WebhookReplyBody,
}

impl WebhookReply {
    fn acknowledged(sig: String) -> Self {
        Self {
            status: StatusCode::OK,
            body: WebhookReplyBody::Acknowledged { sig },
        }
    }

    fn rejected(error: &WebhookError) -> Self {
        Self {
            status: error.status_code(),
            body: WebhookReplyBody::Rejected(error.response_body()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[derive(Serialize)]
struct SignatureEcho<'a> {
    sig: &'a str,
}

impl IntoResponse for WebhookReply {
    fn into_response(self) -> Response {
        match self.body {
            WebhookReplyBody::Acknowledged { sig } => {
                (self.status, Json(SignatureEcho { sig: &sig })).into_response()
            }
            WebhookReplyBody::Rejected(text) => (self.status, text).into_response(),
        }
    }
}

/// Handler for Stripe webhook deliveries.
///
/// Every delivery that passes verification is acknowledged with 200, whether
/// or not the event type matters here. Emission is fire-and-forget: a
/// publisher failure is logged and never changes the reply. Redeliveries are
/// emitted again; consumers must tolerate duplicates.
pub struct HandleStripeWebhookHandler {
    verifier: StripeWebhookVerifier,
    event_publisher: Arc<dyn EventPublisher>,
}

impl HandleStripeWebhookHandler {
    pub fn new(verifier: StripeWebhookVerifier, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            verifier,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: HandleStripeWebhookCommand) -> WebhookReply {
        let Some(signature) = cmd.signature else {
            tracing::warn!("Webhook rejected: missing stripe-signature header");
            return WebhookReply::rejected(&WebhookError::MissingSignature);
        };

        match self.process(&cmd.payload, &signature).await {
            Ok(_) => WebhookReply::acknowledged(signature),
            Err(error) => {
                tracing::warn!(error = %error, "Webhook rejected");
                WebhookReply::rejected(&error)
            }
        }
    }

    /// Verify, interpret and dispatch a single delivery.
    pub async fn process(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookOutcome, WebhookError> {
        // 1. Verify signature over the raw body and parse the envelope
        let event = self.verifier.verify_and_parse(payload, signature)?;

        tracing::debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Webhook verified"
        );

        // 2. Interpret and dispatch
        match VerifiedEvent::from_stripe_event(&event) {
            VerifiedEvent::ChargeSucceeded(charge) => {
                let message = PaymentSucceeded::from(charge);
                self.emit(&event.id, &message).await;
                Ok(WebhookOutcome::Dispatched(message))
            }
            VerifiedEvent::Unrecognized {
                event_id,
                event_type,
            } => {
                tracing::debug!(event_id = %event_id, event_type = %event_type, "Ignoring webhook event");
                Ok(WebhookOutcome::Ignored { event_type })
            }
            VerifiedEvent::UnreadableCharge { event_id, reason } => {
                tracing::warn!(
                    event_id = %event_id,
                    error = %reason,
                    "Verified charge.succeeded has an unreadable charge object; nothing emitted"
                );
                Ok(WebhookOutcome::Unreadable { event_id })
            }
        }
    }

    async fn emit(&self, event_id: &str, message: &PaymentSucceeded) {
        let outbound = match OutboundEvent::payment_succeeded(message) {
            Ok(outbound) => outbound,
            Err(e) => {
                tracing::error!(event_id = %event_id, error = %e, "Failed to encode payment.succeeded");
                return;
            }
        };

        match self.event_publisher.publish(outbound).await {
            Ok(()) => tracing::info!(
                event_id = %event_id,
                charge_id = %message.stripe_payment_id,
                order_id = message.order_id.as_deref().unwrap_or(""),
                "payment.succeeded emitted"
            ),
            Err(e) => tracing::warn!(
                event_id = %event_id,
                charge_id = %message.stripe_payment_id,
                error = %e,
                "Failed to emit payment.succeeded"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::domain::payment::sign_payload;
    use crate::ports::PublishError;
    use async_trait::async_trait;
    use secrecy::SecretString;
    use serde_json::json;

    const SECRET: &str = "whsec_test_secret";

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    struct FailingPublisher;

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _event: OutboundEvent) -> Result<(), PublishError> {
            Err(PublishError::Transport("connection refused".to_string()))
        }
    }

    fn handler_with(publisher: Arc<dyn EventPublisher>) -> HandleStripeWebhookHandler {
        let verifier = StripeWebhookVerifier::new(SecretString::new(SECRET.to_string()));
        HandleStripeWebhookHandler::new(verifier, publisher)
    }

    fn charge_event(metadata: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_1",
            "type": "charge.succeeded",
            "created": 1_700_000_000,
            "livemode": false,
            "data": {
                "object": {
                    "id": "ch_123",
                    "object": "charge",
                    "metadata": metadata,
                    "receipt_url": "https://pay.stripe.com/receipts/ch_123"
                }
            }
        }))
        .unwrap()
    }

    fn signed(payload: &[u8]) -> HandleStripeWebhookCommand {
        let now = chrono::Utc::now().timestamp();
        HandleStripeWebhookCommand {
            signature: Some(sign_payload(SECRET, now, payload).unwrap()),
            payload: payload.to_vec(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn charge_succeeded_emits_exactly_one_message() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(bus.clone());

        let cmd = signed(&charge_event(json!({"orderId": "ORD-1"})));
        let signature = cmd.signature.clone().unwrap();
        let reply = handler.handle(cmd).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, WebhookReplyBody::Acknowledged { sig: signature });

        let events = bus.events_of_type("payment.succeeded");
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].data,
            json!({
                "stripePaymentId": "ch_123",
                "orderId": "ORD-1",
                "receiptUrl": "https://pay.stripe.com/receipts/ch_123"
            })
        );
    }

    #[tokio::test]
    async fn missing_order_id_is_omitted_from_message() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(bus.clone());

        let reply = handler.handle(signed(&charge_event(json!({})))).await;

        assert!(reply.is_success());
        let events = bus.published_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].data.get("orderId").is_none());
        assert_eq!(events[0].data["stripePaymentId"], "ch_123");
    }

    #[tokio::test]
    async fn other_event_types_are_acknowledged_without_emission() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(bus.clone());
        let payload = serde_json::to_vec(&json!({
            "id": "evt_2",
            "type": "payment_intent.created",
            "data": {"object": {"id": "pi_1"}}
        }))
        .unwrap();

        let reply = handler.handle(signed(&payload)).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn missing_signature_is_rejected() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(bus.clone());

        let reply = handler
            .handle(HandleStripeWebhookCommand {
                signature: None,
                payload: charge_event(json!({"orderId": "ORD-1"})),
            })
            .await;

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.body,
            WebhookReplyBody::Rejected("Webhook Error: Missing stripe-signature header".to_string())
        );
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn tampered_body_is_rejected_without_emission() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(bus.clone());
        let mut cmd = signed(&charge_event(json!({"orderId": "ORD-1"})));
        cmd.payload = charge_event(json!({"orderId": "ORD-2"}));

        let reply = handler.handle(cmd).await;

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        match reply.body {
            WebhookReplyBody::Rejected(text) => assert!(text.starts_with("Webhook Error: ")),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn publisher_failure_does_not_change_reply() {
        let handler = handler_with(Arc::new(FailingPublisher));

        let reply = handler
            .handle(signed(&charge_event(json!({"orderId": "ORD-1"}))))
            .await;

        assert_eq!(reply.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn redelivery_is_emitted_again() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(bus.clone());
        let payload = charge_event(json!({"orderId": "ORD-1"}));

        handler.handle(signed(&payload)).await;
        handler.handle(signed(&payload)).await;

        assert_eq!(bus.events_of_type("payment.succeeded").len(), 2);
    }

    #[tokio::test]
    async fn process_reports_outcome() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(bus);
        let payload = charge_event(json!({"orderId": "ORD-9"}));
        let signature = sign_payload(SECRET, chrono::Utc::now().timestamp(), &payload).unwrap();

        let outcome = handler.process(&payload, &signature).await.unwrap();

        match outcome {
            WebhookOutcome::Dispatched(message) => {
                assert_eq!(message.order_id.as_deref(), Some("ORD-9"))
            }
            other => panic!("expected dispatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn verified_charge_with_bad_object_is_acknowledged_without_emission() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(bus.clone());
        let payload = serde_json::to_vec(&json!({
            "id": "evt_3",
            "type": "charge.succeeded",
            "data": {"object": {"amount": 100}}
        }))
        .unwrap();
        let signature = sign_payload(SECRET, chrono::Utc::now().timestamp(), &payload).unwrap();

        let outcome = handler.process(&payload, &signature).await.unwrap();
        let reply = handler.handle(signed(&payload)).await;

        assert_eq!(
            outcome,
            WebhookOutcome::Unreadable {
                event_id: "evt_3".to_string()
            }
        );
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn null_metadata_still_emits_without_order_id() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler_with(bus.clone());

        let reply = handler.handle(signed(&charge_event(json!(null)))).await;

        assert_eq!(reply.status, StatusCode::OK);
        let events = bus.published_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].data.get("orderId").is_none());
        assert_eq!(events[0].data["stripePaymentId"], "ch_123");
    }
}
