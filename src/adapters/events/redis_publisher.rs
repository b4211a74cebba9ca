//! RedisEventPublisher - Queued pub/sub delivery of outbound events.
//!
//! `publish` only enqueues onto a bounded channel. A background worker owns
//! the Redis connection and performs `PUBLISH <pattern> <json>` with retries:
//!
//! 1. Webhook handler calls `publish` → event is queued (never blocks)
//! 2. **Worker pops the event and publishes it** ← retried with linear backoff
//! 3. On shutdown the worker drains what is still queued, then exits
//!
//! Delivery is at-least-once: a retry after an ambiguous failure may publish
//! the same event twice.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `queue_capacity` | 1024 | Events buffered before `publish` reports `QueueFull` |
//! | `max_attempts` | 3 | `PUBLISH` tries per event |
//! | `retry_backoff` | 200ms | Base delay, multiplied by the attempt number |

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::ports::{EventPublisher, OutboundEvent, PublishError};

/// Configuration for the publisher worker.
#[derive(Debug, Clone)]
pub struct RedisPublisherConfig {
    pub queue_capacity: usize,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for RedisPublisherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

impl RedisPublisherConfig {
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

/// Destination the worker writes to.
///
/// Implemented for the Redis multiplexed connection; tests substitute a
/// recording sink.
#[async_trait]
pub trait ChannelSink: Send + 'static {
    async fn send(&mut self, channel: &str, payload: &str) -> Result<(), PublishError>;
}

#[async_trait]
impl ChannelSink for MultiplexedConnection {
    async fn send(&mut self, channel: &str, payload: &str) -> Result<(), PublishError> {
        let _receivers: i64 = self
            .publish(channel, payload)
            .await
            .map_err(|e: redis::RedisError| PublishError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Publisher half, shared with request handlers.
#[derive(Clone)]
pub struct RedisEventPublisher {
    sender: mpsc::Sender<OutboundEvent>,
}

/// Owner of the background worker.
pub struct PublisherWorker {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl PublisherWorker {
    /// Signal the worker to drain the queue and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            tracing::error!(error = %e, "Event publisher worker panicked");
        }
    }
}

impl RedisEventPublisher {
    /// Start the worker on the current runtime.
    pub fn spawn<S: ChannelSink>(sink: S, config: RedisPublisherConfig) -> (Self, PublisherWorker) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = Worker { sink, config };
        let join = tokio::spawn(worker.run(receiver, shutdown_rx));

        (
            Self { sender },
            PublisherWorker {
                shutdown: shutdown_tx,
                join,
            },
        )
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: OutboundEvent) -> Result<(), PublishError> {
        self.sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => PublishError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => PublishError::Closed,
        })
    }
}

struct Worker<S> {
    sink: S,
    config: RedisPublisherConfig,
}

impl<S: ChannelSink> Worker<S> {
    async fn run(
        mut self,
        mut receiver: mpsc::Receiver<OutboundEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                next = receiver.recv() => match next {
                    Some(event) => self.deliver(event).await,
                    None => break,
                },
                _ = shutdown.changed() => {
                    receiver.close();
                    let mut drained = 0usize;
                    while let Some(event) = receiver.recv().await {
                        self.deliver(event).await;
                        drained += 1;
                    }
                    tracing::info!(drained, "Event publisher drained");
                    break;
                }
            }
        }
    }

    async fn deliver(&mut self, event: OutboundEvent) {
        let payload = match event.to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(pattern = %event.pattern, error = %e, "Dropping unencodable event");
                return;
            }
        };

        let max_attempts = self.config.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.sink.send(&event.pattern, &payload).await {
                Ok(()) => {
                    tracing::debug!(pattern = %event.pattern, attempt, "Event published");
                    return;
                }
                Err(e) if attempt < max_attempts => {
                    tracing::warn!(pattern = %event.pattern, attempt, error = %e, "Publish failed, retrying");
                    tokio::time::sleep(self.config.retry_backoff * attempt).await;
                }
                Err(e) => {
                    tracing::error!(pattern = %event.pattern, attempts = attempt, error = %e, "Publish failed, dropping event");
                }
            }
        }
    }
}
