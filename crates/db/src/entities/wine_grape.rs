//! Wine-grape link entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Share of a grape variety in a wine.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "wine_grape")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub wine_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub grape_id: i32,

    /// 0..=100 when set.
    #[sea_orm(column_type = "Double", nullable)]
    pub percentage: Option<f64>,
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
    #[sea_orm(
        belongs_to = "super::grape::Entity",
        from = "Column::GrapeId",
        to = "super::grape::Column::Id"
    )]
    Grape,
}

impl Related<super::wine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wine.def()
    }
}

impl Related<super::grape::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grape.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
