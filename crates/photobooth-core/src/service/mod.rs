//! Caller-facing operations: submit, get, delete.

mod publisher;
mod retrieval;

pub use publisher::SubmissionPublisher;
pub use retrieval::PhotoService;
