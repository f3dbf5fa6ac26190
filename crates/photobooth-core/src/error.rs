//! Error types for the Photobooth derivative pipeline.
//!
//! Errors are split by who handles them: per-message pipeline failures are
//! terminal and logged by the worker, store and queue faults escape to the
//! supervisor or to the caller, and configuration errors stop the process
//! before anything starts.

use thiserror::Error;
use uuid::Uuid;

use crate::types::Scale;

/// Top-level error type for Photobooth operations.
#[derive(Error, Debug)]
pub enum PhotoboothError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Work queue errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Terminal per-submission failures, organized by pipeline stage.
///
/// None of these are retried: the message that produced them is already
/// acknowledged and is dropped after the failure is logged.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The payload is not valid base64
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The decoded payload is neither JPEG nor PNG
    #[error("Unsupported format: {mime}")]
    UnsupportedFormat { mime: String },

    /// The payload sniffs as a supported format but the image data is broken
    #[error("Corrupt {mime} image: {message}")]
    Corrupt { mime: String, message: String },

    /// Derivative generation failed at a specific scale
    #[error("Resize to {scale} failed: {message}")]
    Resize { scale: Scale, message: String },
}

/// Errors raised by an [`PhotoStore`](crate::store::PhotoStore) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record exists with this identifier
    #[error("Photo not found: {0}")]
    NotFound(Uuid),

    /// Soft delete matched no live record
    #[error("Photo not found or already deleted: {0}")]
    NotFoundOrAlreadyDeleted(Uuid),

    /// The backing store could not be reached or rejected the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a [`PhotoQueue`](crate::queue::PhotoQueue) backend.
#[derive(Error, Debug)]
pub enum QueueError {
    /// Publishing did not complete within the configured deadline
    #[error("Publish to queue '{queue}' timed out after {timeout_ms}ms")]
    PublishTimeout { queue: String, timeout_ms: u64 },

    /// The broker could not be reached or rejected the operation
    #[error("Queue unavailable: {0}")]
    Unavailable(String),

    /// The subscription's message stream ended
    #[error("Subscription to queue '{0}' closed")]
    Closed(String),
}

/// Faults that escape a single subscription and are handled by the
/// supervisor's restart-with-delay loop.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A transform panicked while handling a message
    #[error("Worker panicked while processing a message: {0}")]
    Panicked(String),
}

/// Convenience type alias for Photobooth results.
pub type Result<T> = std::result::Result<T, PhotoboothError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_error_names_the_scale() {
        let err = PipelineError::Resize {
            scale: Scale::Half,
            message: "encoder rejected buffer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Resize to 50% failed: encoder rejected buffer"
        );
    }

    #[test]
    fn test_worker_error_is_transparent_over_store() {
        let id = Uuid::nil();
        let err = WorkerError::from(StoreError::Unavailable("connection reset".into()));
        assert_eq!(err.to_string(), "Store unavailable: connection reset");

        let err = PhotoboothError::from(StoreError::NotFound(id));
        assert!(err.to_string().contains("Photo not found"));
    }
}
