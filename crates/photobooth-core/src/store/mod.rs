//! Record store contract and backends.
//!
//! The store assigns identifiers, persists all four image fields in one
//! create call and only ever soft-deletes.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{entity, PostgresStore};

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{resolve_env_var, StoreBackend, StoreConfig};
use crate::error::StoreError;
use crate::types::{NewPhotoRecord, PhotoRecord};

/// Persistence operations the pipeline and the retrieval service rely on.
///
/// Implementations must be safe to share between request handlers and the
/// worker task, and must impose their own I/O timeouts.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist a complete record and return its newly assigned identifier.
    async fn create(&self, record: NewPhotoRecord) -> Result<Uuid, StoreError>;

    /// Fetch a record, soft-deleted or not.
    async fn find_by_id(&self, id: Uuid) -> Result<PhotoRecord, StoreError>;

    /// Overwrite every field of the record with the same identifier.
    async fn update(&self, record: &PhotoRecord) -> Result<(), StoreError>;

    /// Mark a live record deleted. Fails unless exactly one row changed.
    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Create the store backend selected in configuration.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn PhotoStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory photo store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let url = resolve_env_var(&config.url).ok_or_else(|| {
                StoreError::Unavailable(format!(
                    "store.url is not set (configured as '{}')",
                    config.url
                ))
            })?;
            let store = PostgresStore::connect(&url, config).await?;
            if config.run_migrations {
                store.migrate().await?;
            }
            Ok(Arc::new(store))
        }
    }
}
