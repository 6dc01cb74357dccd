//! Wine purchase entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "wine_purchase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub wine_id: i32,

    /// Owned place row.
    pub place_id: i32,

    #[sea_orm(column_type = "Double")]
    pub price_paid: f64,

    pub purchased_at: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
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
        belongs_to = "super::place::Entity",
        from = "Column::PlaceId",
        to = "super::place::Column::Id"
    )]
    Place,
}

impl Related<super::wine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wine.def()
    }
}

impl Related<super::place::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Place.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
