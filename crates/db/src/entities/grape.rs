//! Grape variety entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::sea_orm_active_enums::GrapeColor;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "grape")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub color: GrapeColor,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wine_grape::Entity")]
    WineGrapes,
}

impl Related<super::wine_grape::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WineGrapes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
