//! Wine award entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::sea_orm_active_enums::AwardName;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "wine_award")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub wine_id: i32,

    pub name: AwardName,

    /// 0..=100 when set.
    pub score: Option<i32>,

    /// 1800..=2200 when set.
    pub year: Option<i32>,
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
