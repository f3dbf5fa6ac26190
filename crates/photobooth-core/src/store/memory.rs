//! Process-local store. Contents are lost when the process exits.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::PhotoStore;
use crate::error::StoreError;
use crate::types::{NewPhotoRecord, PhotoRecord};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, PhotoRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records, deleted ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Snapshot of every record.
    pub async fn records(&self) -> Vec<PhotoRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl PhotoStore for MemoryStore {
    async fn create(&self, record: NewPhotoRecord) -> Result<Uuid, StoreError> {
        let mut records = self.records.write().await;
        let mut id = Uuid::new_v4();
        while records.contains_key(&id) {
            id = Uuid::new_v4();
        }
        records.insert(id, PhotoRecord::from_new(id, record));
        tracing::info!("photo created with id: {}", id);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<PhotoRecord, StoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, record: &PhotoRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(record.id)),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if !record.is_deleted => {
                record.is_deleted = true;
                tracing::debug!("photo with id = {} deleted", id);
                Ok(())
            }
            _ => Err(StoreError::NotFoundOrAlreadyDeleted(id)),
        }
    }
}
