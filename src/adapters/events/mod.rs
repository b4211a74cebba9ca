//! Event publisher adapters.
//!
//! Adapters implement the `EventPublisher` port for different environments:
//!
//! - `InMemoryEventBus` - In-process capture for tests and local runs
//! - `RedisEventPublisher` - Queued Redis pub/sub delivery with retries

mod in_memory;
mod redis_publisher;

pub use in_memory::InMemoryEventBus;
pub use redis_publisher::{ChannelSink, PublisherWorker, RedisEventPublisher, RedisPublisherConfig};
