//! Payments Gateway
//!
//! ## REST Endpoints
//!
//! - `POST /payments/create-payment-session` - Create a hosted checkout session
//! - `GET /payments/success` - Checkout success landing
//! - `GET /payments/cancel` - Checkout cancel landing
//! - `POST /payments/webhook` - Stripe webhook handler
//! - `GET /health` - Liveness probe
//!
//! ## Events
//!
//! Verified `charge.succeeded` webhooks are published to Redis on the
//! `payment.succeeded` channel.

use std::sync::Arc;

use thiserror::Error;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use payments_gateway::adapters::events::{RedisEventPublisher, RedisPublisherConfig};
use payments_gateway::adapters::http::{build_app, PaymentsAppState};
use payments_gateway::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use payments_gateway::application::CheckoutRedirects;
use payments_gateway::config::{AppConfig, ConfigError, ServerConfig, ValidationError};
use payments_gateway::domain::payment::StripeWebhookVerifier;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Redis connection failed: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Configuration comes first: the log filter lives in it
    let config = AppConfig::load_validated()?;

    init_tracing(&config.server)?;

    tracing::info!(
        environment = ?config.server.environment,
        port = config.server.port,
        stripe_test_mode = config.payment.is_test_mode(),
        "Starting payments gateway"
    );

    // Downstream event channel
    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let connection = redis_client.get_multiplexed_async_connection().await?;
    let publisher_config = RedisPublisherConfig::default()
        .with_queue_capacity(config.redis.queue_capacity)
        .with_max_attempts(config.redis.max_publish_attempts)
        .with_retry_backoff(config.redis.retry_backoff());
    let (event_publisher, publisher_worker) =
        RedisEventPublisher::spawn(connection, publisher_config);
    tracing::info!("Redis event publisher started");

    // Stripe
    let stripe_config = StripeConfig::new(config.payment.stripe_secret.clone())
        .with_base_url(config.payment.stripe_api_base_url.clone());
    let verifier = StripeWebhookVerifier::new(config.payment.stripe_endpoint_secret.clone())
        .with_tolerance_secs(config.payment.webhook_tolerance_secs);

    let state = PaymentsAppState {
        payment_processor: Arc::new(StripePaymentAdapter::new(stripe_config)),
        event_publisher: Arc::new(event_publisher),
        webhook_verifier: verifier,
        redirects: CheckoutRedirects {
            success_url: config.payment.stripe_success_url.clone(),
            cancel_url: config.payment.stripe_cancel_url.clone(),
        },
    };

    let app = build_app(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush events accepted before shutdown
    publisher_worker.shutdown().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(server: &ServerConfig) -> Result<(), StartupError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .map_err(|e| StartupError::Logging(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if server.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
