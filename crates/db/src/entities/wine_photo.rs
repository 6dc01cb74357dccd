//! Wine photo entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::sea_orm_active_enums::PhotoType;

/// Metadata of a stored photo. The file itself lives in photo storage.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "wine_photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub wine_id: i32,

    pub url: String,

    /// At most one photo per wine for each non-null type.
    #[sea_orm(column_name = "type")]
    pub photo_type: Option<PhotoType>,

    /// First 16 hex chars of the content SHA-256.
    pub hash: String,

    pub size: i64,

    pub extension: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wine::Entity",
        from = "Column::WineId",
        to = "super::wine::Column::Id",
        on_delete = "Cascade"
    )]
    Wine,
}

impl Related<super::wine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
