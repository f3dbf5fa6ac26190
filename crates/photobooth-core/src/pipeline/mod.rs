//! Photo-derivative pipeline components.
//!
//! This module contains all the stages of the asynchronous pipeline:
//! - **detect**: Sniff the submitted bytes for JPEG or PNG
//! - **derivative**: Resize and re-encode at a fixed scale
//! - **processor**: Decode, detect and resize one submission
//! - **worker**: Drain a subscription and persist records
//! - **supervisor**: Restart the subscription after faults

pub mod derivative;
pub mod detect;
pub mod processor;
pub mod supervisor;
pub mod worker;

// Re-exports for convenient access
pub use derivative::DerivativeGenerator;
pub use detect::{detect, sniff_mime, SourceFormat};
pub use processor::{PhotoProcessor, Stage};
pub use supervisor::Supervisor;
pub use worker::{MessageOutcome, PipelineWorker, Transform};
