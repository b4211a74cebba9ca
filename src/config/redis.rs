//! Redis configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Redis configuration (downstream event channel)
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,

    /// Events buffered before publishing reports a full queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// PUBLISH tries per event
    #[serde(default = "default_max_publish_attempts")]
    pub max_publish_attempts: u32,

    /// Base retry delay in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl RedisConfig {
    /// Get retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if self.max_publish_attempts == 0 {
            return Err(ValidationError::InvalidPublishAttempts);
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            queue_capacity: default_queue_capacity(),
            max_publish_attempts: default_max_publish_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_max_publish_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    200
}
