//! The `photos` table.
use sea_orm::entity::prelude::*;

use crate::types::PhotoRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Base64 original upload
    #[sea_orm(column_type = "Text")]
    pub data_origin: String,
    #[sea_orm(column_type = "Text")]
    pub data_75: String,
    #[sea_orm(column_type = "Text")]
    pub data_50: String,
    #[sea_orm(column_type = "Text")]
    pub data_25: String,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PhotoRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            origin: model.data_origin,
            variant_75: model.data_75,
            variant_50: model.data_50,
            variant_25: model.data_25,
            is_deleted: model.is_deleted,
        }
    }
}
