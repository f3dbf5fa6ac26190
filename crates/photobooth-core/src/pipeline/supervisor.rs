//! Restart-with-delay supervision of the queue subscription.
//!
//! Any fault that escapes the worker (subscription setup, a closed stream,
//! a store outage, a panicking transform) tears the subscription down. The
//! supervisor logs it, waits a fixed delay and subscribes again. There is
//! no backoff growth and no distinction between transient and permanent
//! faults. The message that was in flight is not redelivered.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::WorkerError;
use crate::queue::PhotoQueue;

use super::worker::PipelineWorker;

/// Keeps one worker subscribed to one queue for the life of the process.
pub struct Supervisor {
    queue: Arc<dyn PhotoQueue>,
    worker: PipelineWorker,
    restart_delay: Duration,
    restarts: AtomicU64,
}

impl Supervisor {
    pub fn new(queue: Arc<dyn PhotoQueue>, worker: PipelineWorker, restart_delay: Duration) -> Self {
        Self {
            queue,
            worker,
            restart_delay,
            restarts: AtomicU64::new(0),
        }
    }

    /// Run forever. Cancel by dropping or aborting the task.
    pub async fn run(&self) {
        loop {
            if let Err(e) = self.run_once().await {
                let restarts = self.restarts.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::error!(
                    "Photo queue consumer failed: {}; restarting in {:?} (restart #{})",
                    e,
                    self.restart_delay,
                    restarts
                );
                tokio::time::sleep(self.restart_delay).await;
            }
        }
    }

    /// Subscribe once and drain until the first fault.
    pub async fn run_once(&self) -> Result<(), WorkerError> {
        let mut subscription = self.queue.subscribe().await?;
        tracing::info!("Consuming photo queue '{}'", self.queue.name());
        self.worker.drain(subscription.as_mut()).await
    }

    /// Number of restarts so far.
    pub fn restarts(&self) -> u64 {
        self.restarts.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::QueueError;
    use crate::pipeline::worker::tests::{jpeg_body, PanicsOn};
    use crate::pipeline::PhotoProcessor;
    use crate::queue::{Delivery, MemoryQueue, Subscription};
    use crate::store::{MemoryStore, PhotoStore};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    /// Fails the first `failures` subscribe attempts, then hands out a
    /// subscription that yields one message and closes.
    struct FlakyQueue {
        failures: usize,
        attempts: AtomicUsize,
        body: Vec<u8>,
    }

    struct OneShot {
        body: Option<Vec<u8>>,
    }

    #[async_trait]
    impl Subscription for OneShot {
        async fn next(&mut self) -> Result<Delivery, QueueError> {
            match self.body.take() {
                Some(body) => Ok(Delivery { body }),
                None => Err(QueueError::Closed("photos".into())),
            }
        }
    }

    #[async_trait]
    impl PhotoQueue for FlakyQueue {
        fn name(&self) -> &str {
            "photos"
        }

        async fn publish(&self, _body: Vec<u8>) -> Result<(), QueueError> {
            Ok(())
        }

        async fn subscribe(&self) -> Result<Box<dyn Subscription>, QueueError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures {
                return Err(QueueError::Unavailable("connection refused".into()));
            }
            Ok(Box::new(OneShot {
                body: Some(self.body.clone()),
            }))
        }
    }

    fn worker(store: Arc<dyn PhotoStore>) -> PipelineWorker {
        PipelineWorker::new(Arc::new(PhotoProcessor::new(&Config::default())), store)
    }

    #[tokio::test]
    async fn test_failed_subscribe_waits_then_retries() {
        let queue = Arc::new(FlakyQueue {
            failures: 2,
            attempts: AtomicUsize::new(0),
            body: b"not an image".to_vec(),
        });
        let supervisor = Arc::new(Supervisor::new(
            queue.clone(),
            worker(Arc::new(MemoryStore::new())),
            Duration::from_millis(50),
        ));

        let start = Instant::now();
        let task = tokio::spawn({
            let supervisor = Arc::clone(&supervisor);
            async move { supervisor.run().await }
        });

        while queue.attempts.load(Ordering::SeqCst) < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        task.abort();

        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(supervisor.restarts() >= 2);
    }

    #[tokio::test]
    async fn test_closed_stream_is_resubscribed_without_redelivery() {
        let queue = Arc::new(FlakyQueue {
            failures: 0,
            attempts: AtomicUsize::new(0),
            body: b"!!".to_vec(),
        });
        let supervisor = Supervisor::new(
            queue.clone(),
            worker(Arc::new(MemoryStore::new())),
            Duration::from_millis(10),
        );

        let err = supervisor.run_once().await.unwrap_err();
        assert!(matches!(err, WorkerError::Queue(QueueError::Closed(_))));
        assert_eq!(queue.attempts.load(Ordering::SeqCst), 1);
    }

    async fn wait_for_records(store: &MemoryStore, count: usize) {
        tokio::time::timeout(Duration::from_secs(10), async {
            while store.len().await < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("worker did not store the record");
    }

    #[tokio::test]
    async fn test_run_keeps_consuming_a_healthy_queue() {
        let queue = Arc::new(MemoryQueue::new("photos"));
        let store = Arc::new(MemoryStore::new());
        let supervisor = Arc::new(Supervisor::new(
            queue.clone(),
            worker(store.clone()),
            Duration::from_millis(10),
        ));
        let task = tokio::spawn({
            let supervisor = Arc::clone(&supervisor);
            async move { supervisor.run().await }
        });

        queue.publish(b"bad".to_vec()).await.unwrap();
        queue.publish(b"worse".to_vec()).await.unwrap();
        queue.publish(jpeg_body(32, 24)).await.unwrap();

        // Messages are handled in order, so the record means both bad ones
        // were dropped before it.
        wait_for_records(&store, 1).await;
        task.abort();

        assert_eq!(store.len().await, 1);
        assert!(queue.is_empty());
        assert_eq!(supervisor.restarts(), 0);
    }

    #[tokio::test]
    async fn test_panic_mid_message_restarts_and_keeps_consuming() {
        let queue = Arc::new(MemoryQueue::new("photos"));
        let store = Arc::new(MemoryStore::new());
        let worker = PipelineWorker::new(
            Arc::new(PanicsOn {
                body: b"boom",
                inner: PhotoProcessor::new(&Config::default()),
            }),
            store.clone(),
        );
        let supervisor = Arc::new(Supervisor::new(
            queue.clone(),
            worker,
            Duration::from_millis(10),
        ));

        queue.publish(b"boom".to_vec()).await.unwrap();
        queue.publish(jpeg_body(32, 24)).await.unwrap();

        let task = tokio::spawn({
            let supervisor = Arc::clone(&supervisor);
            async move { supervisor.run().await }
        });
        wait_for_records(&store, 1).await;
        task.abort();

        assert_eq!(supervisor.restarts(), 1);
        assert_eq!(store.len().await, 1);
    }
}
