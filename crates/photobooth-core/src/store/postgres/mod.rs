//! PostgreSQL store backed by sea-orm.

pub mod entity;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, Schema, Set,
};
use std::time::Duration;
use uuid::Uuid;

use self::entity::{ActiveModel, Column, Entity};
use super::PhotoStore;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::types::{NewPhotoRecord, PhotoRecord};

fn unavailable(e: DbErr) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[derive(Clone)]
pub struct PostgresStore {
    db: DatabaseConnection,
}

impl PostgresStore {
    /// Open a connection pool.
    pub async fn connect(url: &str, config: &StoreConfig) -> Result<Self, StoreError> {
        let mut options = ConnectOptions::new(url.to_owned());
        options
            .max_connections(config.max_connections)
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .acquire_timeout(Duration::from_millis(config.connect_timeout_ms))
            .sqlx_logging(false);

        let db = Database::connect(options).await.map_err(unavailable)?;
        tracing::info!("Connected to PostgreSQL photo store");
        Ok(Self { db })
    }

    /// Wrap an existing connection.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `photos` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let backend = self.db.get_database_backend();
        let stmt = Schema::new(backend)
            .create_table_from_entity(Entity)
            .if_not_exists()
            .to_owned();
        self.db
            .execute(backend.build(&stmt))
            .await
            .map_err(unavailable)?;
        tracing::info!("photos table is up to date");
        Ok(())
    }
}

#[async_trait]
impl PhotoStore for PostgresStore {
    async fn create(&self, record: NewPhotoRecord) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let model = ActiveModel {
            id: Set(id),
            data_origin: Set(record.origin),
            data_75: Set(record.variant_75),
            data_50: Set(record.variant_50),
            data_25: Set(record.variant_25),
            is_deleted: Set(record.is_deleted),
        };
        Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(unavailable)?;

        tracing::info!("photo created with id: {}", id);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<PhotoRecord, StoreError> {
        Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(unavailable)?
            .map(PhotoRecord::from)
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, record: &PhotoRecord) -> Result<(), StoreError> {
        let result = Entity::update_many()
            .col_expr(Column::DataOrigin, Expr::value(record.origin.clone()))
            .col_expr(Column::Data75, Expr::value(record.variant_75.clone()))
            .col_expr(Column::Data50, Expr::value(record.variant_50.clone()))
            .col_expr(Column::Data25, Expr::value(record.variant_25.clone()))
            .col_expr(Column::IsDeleted, Expr::value(record.is_deleted))
            .filter(Column::Id.eq(record.id))
            .exec(&self.db)
            .await
            .map_err(unavailable)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(record.id));
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = Entity::update_many()
            .col_expr(Column::IsDeleted, Expr::value(true))
            .filter(Column::Id.eq(id))
            .filter(Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await
            .map_err(unavailable)?;

        if result.rows_affected != 1 {
            return Err(StoreError::NotFoundOrAlreadyDeleted(id));
        }
        tracing::debug!("photo with id = {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: Uuid) -> entity::Model {
        entity::Model {
            id,
            data_origin: "b3JpZ2lu".into(),
            data_75: "NzU=".into(),
            data_50: "NTA=".into(),
            data_25: "MjU=".into(),
            is_deleted: true,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_columns() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(id)]])
            .into_connection();
        let store = PostgresStore::from_connection(db);

        let record = store.find_by_id(id).await.unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.origin, "b3JpZ2lu");
        assert_eq!(record.variant_25, "MjU=");
        assert!(record.is_deleted);
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let store = PostgresStore::from_connection(db);

        assert!(matches!(
            store.find_by_id(Uuid::new_v4()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_returns_generated_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .into_connection();
        let store = PostgresStore::from_connection(db);

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
        assert!(!id.is_nil());
    }

    #[tokio::test]
    async fn test_soft_delete_requires_exactly_one_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();
        let store = PostgresStore::from_connection(db);
        let id = Uuid::new_v4();

        store.soft_delete(id).await.unwrap();
        assert!(matches!(
            store.soft_delete(id).await,
            Err(StoreError::NotFoundOrAlreadyDeleted(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();
        let store = PostgresStore::from_connection(db);

        let record = PhotoRecord::from(model(Uuid::new_v4()));
        assert!(matches!(
            store.update(&record).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_database_errors_surface_as_unavailable() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let store = PostgresStore::from_connection(db);

        match store.soft_delete(Uuid::new_v4()).await {
            Err(StoreError::Unavailable(message)) => assert!(message.contains("connection reset")),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
