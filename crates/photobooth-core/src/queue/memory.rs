//! In-process queue backed by a `flume` channel.
//!
//! Producer and worker must live in the same process. Every subscription
//! clones the receiver, so concurrent subscribers compete for messages
//! the same way consumers of a broker queue do.

use async_trait::async_trait;

use super::{Delivery, PhotoQueue, Subscription};
use crate::error::QueueError;

pub struct MemoryQueue {
    name: String,
    sender: flume::Sender<Vec<u8>>,
    receiver: flume::Receiver<Vec<u8>>,
}

impl MemoryQueue {
    /// Unbounded queue.
    pub fn new(name: &str) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            name: name.to_string(),
            sender,
            receiver,
        }
    }

    /// Bounded queue; publishing blocks while `capacity` messages are waiting.
    pub fn bounded(name: &str, capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded(capacity);
        Self {
            name: name.to_string(),
            sender,
            receiver,
        }
    }

    /// Number of messages waiting for a subscriber.
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}

#[async_trait]
impl PhotoQueue for MemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, body: Vec<u8>) -> Result<(), QueueError> {
        self.sender
            .send_async(body)
            .await
            .map_err(|_| QueueError::Closed(self.name.clone()))
    }

    async fn subscribe(&self) -> Result<Box<dyn Subscription>, QueueError> {
        Ok(Box::new(MemorySubscription {
            name: self.name.clone(),
            receiver: self.receiver.clone(),
        }))
    }
}

pub struct MemorySubscription {
    name: String,
    receiver: flume::Receiver<Vec<u8>>,
}

#[async_trait]
impl Subscription for MemorySubscription {
    async fn next(&mut self) -> Result<Delivery, QueueError> {
        let body = self
            .receiver
            .recv_async()
            .await
            .map_err(|_| QueueError::Closed(self.name.clone()))?;
        tracing::trace!("message received from '{}': {} bytes", self.name, body.len());
        Ok(Delivery { body })
    }
}
