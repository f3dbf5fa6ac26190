//! Photobooth Core - asynchronous photo-derivative pipeline.
//!
//! Photos are submitted as base64 text, queued, and turned by a background
//! worker into a stored record holding the original plus three scaled JPEG
//! derivatives (75%, 50%, 25%). Callers read a single rendition back by
//! record identifier and can soft-delete records.
//!
//! # Architecture
//!
//! ```text
//! submit → queue → worker: decode → detect → resize ×3 → store
//!                                                         ↑
//!                              get / delete ──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use photobooth_core::{Config, Photobooth, PhotoSubmission};
//!
//! #[tokio::main]
//! async fn main() -> photobooth_core::Result<()> {
//!     let booth = Photobooth::connect(Config::load()?).await?;
//!     tokio::spawn({
//!         let supervisor = booth.supervisor();
//!         async move { supervisor.run().await }
//!     });
//!
//!     booth.publisher().submit(PhotoSubmission::new(base64_jpeg)).await?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod queue;
pub mod service;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, PhotoboothError, PipelineError, PipelineResult, QueueError, Result, StoreError,
    WorkerError,
};
pub use pipeline::{PhotoProcessor, PipelineWorker, Supervisor};
pub use queue::PhotoQueue;
pub use service::{PhotoService, SubmissionPublisher};
pub use store::PhotoStore;
pub use types::{NewPhotoRecord, Photo, PhotoRecord, PhotoSubmission, Quality, Scale};

use std::sync::Arc;
use std::time::Duration;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wires one queue and one store into the publisher, the retrieval service
/// and the worker supervisor.
pub struct Photobooth {
    config: Config,
    queue: Arc<dyn PhotoQueue>,
    store: Arc<dyn PhotoStore>,
}

impl Photobooth {
    /// Connect the queue and store backends named in the configuration.
    pub async fn connect(config: Config) -> Result<Self> {
        tracing::debug!("Initializing Photobooth v{}", VERSION);
        config.validate()?;
        let queue = queue::connect(&config.queue).await?;
        let store = store::connect(&config.store).await?;
        Ok(Self::with_backends(config, queue, store))
    }

    /// Use already-constructed backends.
    pub fn with_backends(
        config: Config,
        queue: Arc<dyn PhotoQueue>,
        store: Arc<dyn PhotoStore>,
    ) -> Self {
        Self {
            config,
            queue,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn publisher(&self) -> SubmissionPublisher {
        SubmissionPublisher::from_config(Arc::clone(&self.queue), &self.config.queue)
    }

    pub fn photos(&self) -> PhotoService {
        PhotoService::new(Arc::clone(&self.store))
    }

    /// Build a supervisor for one worker. Call `run` on it in its own task.
    pub fn supervisor(&self) -> Arc<Supervisor> {
        let processor = Arc::new(PhotoProcessor::new(&self.config));
        let worker = PipelineWorker::new(processor, Arc::clone(&self.store));
        Arc::new(Supervisor::new(
            Arc::clone(&self.queue),
            worker,
            Duration::from_millis(self.config.worker.restart_delay_ms),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_connect_with_default_backends() {
        let booth = Photobooth::connect(Config::default()).await.unwrap();
        assert_eq!(booth.config().queue.name, "photos");
        assert!(booth.photos().get_by_id(uuid::Uuid::new_v4(), "100").await.is_err());
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let mut config = Config::default();
        config.derivative.jpeg_quality = 0;
        assert!(matches!(
            Photobooth::connect(config).await,
            Err(PhotoboothError::Config(_))
        ));
    }
}
