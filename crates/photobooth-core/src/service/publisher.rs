//! Submission publisher: hands photos to the queue and returns.
//!
//! A successful publish only means the queue accepted the body. Whether a
//! record is ever created is decided later, by the worker, and is not
//! reported back.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::queue::PhotoQueue;
use crate::types::PhotoSubmission;

pub struct SubmissionPublisher {
    queue: Arc<dyn PhotoQueue>,
    deadline: Duration,
}

impl SubmissionPublisher {
    pub fn new(queue: Arc<dyn PhotoQueue>, deadline: Duration) -> Self {
        Self { queue, deadline }
    }

    pub fn from_config(queue: Arc<dyn PhotoQueue>, config: &QueueConfig) -> Self {
        Self::new(queue, Duration::from_millis(config.publish_timeout_ms))
    }

    /// Enqueue a submission, failing with `PublishTimeout` past the deadline.
    pub async fn submit(&self, submission: PhotoSubmission) -> Result<(), QueueError> {
        let size = submission.data.len();
        match timeout(self.deadline, self.queue.publish(submission.into_body())).await {
            Ok(Ok(())) => {
                tracing::debug!("Queued submission ({} bytes) on '{}'", size, self.queue.name());
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(QueueError::PublishTimeout {
                queue: self.queue.name().to_string(),
                timeout_ms: self.deadline.as_millis() as u64,
            }),
        }
    }
}
