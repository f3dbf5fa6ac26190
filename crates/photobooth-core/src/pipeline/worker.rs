//! Pipeline worker: drains one subscription, one message at a time.
//!
//! Messages arrive already acknowledged. A per-message pipeline failure is
//! logged and the message is gone; store faults and panics end the drain
//! and are left to the supervisor.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::{PipelineError, PipelineResult, WorkerError};
use crate::queue::{Delivery, Subscription};
use crate::store::PhotoStore;
use crate::types::NewPhotoRecord;

use super::processor::{PhotoProcessor, Stage};

/// Longest slice of a failing body quoted in logs.
const BODY_PREVIEW_LEN: usize = 64;

/// What happened to one delivered message.
#[derive(Debug)]
pub enum MessageOutcome {
    /// A record was created with this identifier
    Created(Uuid),
    /// The pipeline rejected the message; it will not be seen again
    Dropped(PipelineError),
}

/// CPU-bound step that turns a queue body into a record. Runs on a
/// blocking thread.
pub trait Transform: Send + Sync + 'static {
    fn transform(&self, body: &[u8]) -> PipelineResult<NewPhotoRecord>;
}

impl Transform for PhotoProcessor {
    fn transform(&self, body: &[u8]) -> PipelineResult<NewPhotoRecord> {
        self.process(body)
    }
}

/// Drives decode, detect, resize and persist for each delivered message.
#[derive(Clone)]
pub struct PipelineWorker {
    processor: Arc<dyn Transform>,
    store: Arc<dyn PhotoStore>,
}

impl PipelineWorker {
    pub fn new(processor: Arc<dyn Transform>, store: Arc<dyn PhotoStore>) -> Self {
        Self { processor, store }
    }

    /// Handle a single delivery end to end.
    pub async fn handle(&self, delivery: Delivery) -> Result<MessageOutcome, WorkerError> {
        let processor = Arc::clone(&self.processor);
        let body = delivery.body;

        let (body, processed) = tokio::task::spawn_blocking(move || {
            let processed = processor.transform(&body);
            (body, processed)
        })
        .await
        .map_err(|e| {
            if e.is_panic() {
                WorkerError::Panicked(panic_message(e.into_panic()))
            } else {
                WorkerError::Panicked(e.to_string())
            }
        })?;

        let record = match processed {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(
                    "Failed to create photo at {} stage: {} (body: {})",
                    e.stage(),
                    e,
                    body_preview(&body)
                );
                return Ok(MessageOutcome::Dropped(e));
            }
        };

        let id = self.store.create(record).await.map_err(|e| {
            tracing::error!(
                "Failed to create photo at {} stage: {} (body: {})",
                Stage::Persisting,
                e,
                body_preview(&body)
            );
            WorkerError::from(e)
        })?;

        Ok(MessageOutcome::Created(id))
    }

    /// Handle deliveries until the subscription or the store fails.
    pub async fn drain(&self, subscription: &mut dyn Subscription) -> Result<(), WorkerError> {
        loop {
            let delivery = subscription.next().await?;
            match self.handle(delivery).await? {
                MessageOutcome::Created(id) => tracing::debug!("Submission stored as {}", id),
                MessageOutcome::Dropped(_) => {}
            }
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(&body[..body.len().min(BODY_PREVIEW_LEN)]);
    if body.len() > BODY_PREVIEW_LEN {
        format!("{}... ({} bytes)", text, body.len())
    } else {
        text.into_owned()
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
