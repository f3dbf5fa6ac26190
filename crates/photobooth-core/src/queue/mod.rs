//! Work queue contract and backends.
//!
//! A queue is a single named destination carrying opaque byte bodies.
//! Subscriptions acknowledge each message as it is delivered, so anything
//! that goes wrong afterwards loses that message: delivery is at-most-once.

mod memory;
mod redis_list;

pub use memory::{MemoryQueue, MemorySubscription};
pub use redis_list::{RedisQueue, RedisSubscription};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{resolve_env_var, QueueBackend, QueueConfig};
use crate::error::QueueError;

/// A message taken off the queue. Already acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub body: Vec<u8>,
}

/// A named queue that producers publish to and workers subscribe to.
///
/// Implementations must be safe to share between request handlers and the
/// worker task.
#[async_trait]
pub trait PhotoQueue: Send + Sync {
    /// The queue's well-known name.
    fn name(&self) -> &str;

    /// Enqueue one body. Deadlines are imposed by the caller.
    async fn publish(&self, body: Vec<u8>) -> Result<(), QueueError>;

    /// Open a new subscription. Several subscriptions compete for messages.
    async fn subscribe(&self) -> Result<Box<dyn Subscription>, QueueError>;
}

/// A blocking iterator over deliveries from one queue.
#[async_trait]
pub trait Subscription: Send {
    /// Wait for the next message. Returns `QueueError::Closed` when the
    /// stream has ended and the subscription must be re-established.
    async fn next(&mut self) -> Result<Delivery, QueueError>;
}

/// Create the queue backend selected in configuration.
pub async fn connect(config: &QueueConfig) -> Result<Arc<dyn PhotoQueue>, QueueError> {
    match config.backend {
        QueueBackend::Memory => {
            tracing::info!("Using in-process queue '{}'", config.name);
            Ok(Arc::new(MemoryQueue::new(&config.name)))
        }
        QueueBackend::Redis => {
            let url = resolve_env_var(&config.url).ok_or_else(|| {
                QueueError::Unavailable(format!(
                    "queue.url is not set (configured as '{}')",
                    config.url
                ))
            })?;
            let queue = RedisQueue::connect(
                &url,
                &config.name,
                Duration::from_secs(config.receive_timeout_secs),
            )
            .await?;
            tracing::info!("Connected to Redis queue '{}'", config.name);
            Ok(Arc::new(queue))
        }
    }
}
