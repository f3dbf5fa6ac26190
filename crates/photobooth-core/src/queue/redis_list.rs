//! Redis list queue.
//!
//! Publish is `LPUSH`, receive is `BRPOP`, giving FIFO order. A popped
//! element is gone from the server, which is the auto-acknowledge contract:
//! the message is considered handled the moment it is delivered.

use async_trait::async_trait;
use redis::aio::{ConnectionManager, MultiplexedConnection};
use std::time::Duration;

use super::{Delivery, PhotoQueue, Subscription};
use crate::error::QueueError;

fn unavailable(e: redis::RedisError) -> QueueError {
    QueueError::Unavailable(e.to_string())
}

pub struct RedisQueue {
    name: String,
    client: redis::Client,
    /// Shared, auto-reconnecting connection for publishing.
    publisher: ConnectionManager,
    receive_timeout: Duration,
}

impl RedisQueue {
    /// Connect to Redis and prepare a publishing connection.
    pub async fn connect(
        url: &str,
        name: &str,
        receive_timeout: Duration,
    ) -> Result<Self, QueueError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let publisher = ConnectionManager::new(client.clone())
            .await
            .map_err(unavailable)?;
        Ok(Self {
            name: name.to_string(),
            client,
            publisher,
            receive_timeout,
        })
    }
}

#[async_trait]
impl PhotoQueue for RedisQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, body: Vec<u8>) -> Result<(), QueueError> {
        let mut conn = self.publisher.clone();
        redis::cmd("LPUSH")
            .arg(&self.name)
            .arg(body)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(unavailable)
    }

    async fn subscribe(&self) -> Result<Box<dyn Subscription>, QueueError> {
        // BRPOP parks the connection, so each subscription gets its own.
        let conn = self
            .client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(unavailable)?;
        Ok(Box::new(RedisSubscription {
            name: self.name.clone(),
            conn,
            timeout_secs: self.receive_timeout.as_secs().max(1),
        }))
    }
}

pub struct RedisSubscription {
    name: String,
    conn: MultiplexedConnection,
    timeout_secs: u64,
}

#[async_trait]
impl Subscription for RedisSubscription {
    async fn next(&mut self) -> Result<Delivery, QueueError> {
        loop {
            let popped: Option<(String, Vec<u8>)> = redis::cmd("BRPOP")
                .arg(&self.name)
                .arg(self.timeout_secs)
                .query_async(&mut self.conn)
                .await
                .map_err(unavailable)?;

            match popped {
                Some((_, body)) => {
                    tracing::trace!("message received from '{}': {} bytes", self.name, body.len());
                    return Ok(Delivery { body });
                }
                // Empty window; keep waiting.
                None => continue,
            }
        }
    }
}
