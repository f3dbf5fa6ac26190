//! Retrieval and soft deletion of stored photos.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::PhotoStore;
use crate::types::{Photo, Quality};

/// Read-side operations, independent of the pipeline.
pub struct PhotoService {
    store: Arc<dyn PhotoStore>,
}

impl PhotoService {
    pub fn new(store: Arc<dyn PhotoStore>) -> Self {
        Self { store }
    }

    /// Fetch one rendition of a record.
    ///
    /// `quality` is "100", "75", "50" or "25". Anything else falls back to
    /// the original and logs a warning rather than failing. Soft-deleted
    /// records are still returned, flagged.
    pub async fn get_by_id(&self, id: Uuid, quality: &str) -> Result<Photo, StoreError> {
        let record = self.store.find_by_id(id).await?;

        let selected = Quality::parse(quality).unwrap_or_else(|| {
            tracing::warn!(
                "Photo quality '{}' not defined, original photo provided for {}",
                quality,
                id
            );
            Quality::Original
        });

        Ok(Photo {
            id: record.id,
            data: record.rendition(selected).to_string(),
            is_deleted: record.is_deleted,
        })
    }

    /// Soft-delete a record. Its data stays in the store.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.soft_delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::NewPhotoRecord;

    async fn seeded() -> (PhotoService, Arc<MemoryStore>, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let id = store
            .create(NewPhotoRecord {
                origin: "b3JpZ2lu".into(),
                variant_75: "NzU=".into(),
                variant_50: "NTA=".into(),
                variant_25: "MjU=".into(),
                is_deleted: false,
            })
            .await
            .unwrap();
        (PhotoService::new(store.clone()), store, id)
    }

    #[tokio::test]
    async fn test_quality_100_returns_stored_origin() {
        let (service, store, id) = seeded().await;
        let photo = service.get_by_id(id, "100").await.unwrap();
        assert_eq!(photo.data, store.find_by_id(id).await.unwrap().origin);
        assert_eq!(photo.id, id);
    }

    #[tokio::test]
    async fn test_each_quality_selects_its_variant() {
        let (service, _, id) = seeded().await;
        assert_eq!(service.get_by_id(id, "75").await.unwrap().data, "NzU=");
        assert_eq!(service.get_by_id(id, "50").await.unwrap().data, "NTA=");
        assert_eq!(service.get_by_id(id, "25").await.unwrap().data, "MjU=");
    }

    #[tokio::test]
    async fn test_unknown_quality_falls_back_to_origin() {
        let (service, _, id) = seeded().await;
        let fallback = service.get_by_id(id, "unknown").await.unwrap();
        let original = service.get_by_id(id, "100").await.unwrap();
        assert_eq!(fallback, original);
    }

    #[tokio::test]
    async fn test_missing_photo_is_not_found() {
        let (service, _, _) = seeded().await;
        assert!(matches!(
            service.get_by_id(Uuid::new_v4(), "100").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_flags_record_and_keeps_it_readable() {
        let (service, _, id) = seeded().await;
        service.delete(id).await.unwrap();

        let photo = service.get_by_id(id, "25").await.unwrap();
        assert!(photo.is_deleted);
        assert_eq!(photo.data, "MjU=");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_fails() {
        let (service, _, _) = seeded().await;
        assert!(matches!(
            service.delete(Uuid::new_v4()).await,
            Err(StoreError::NotFoundOrAlreadyDeleted(_))
        ));
    }
}
