//! Wine entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::sea_orm_active_enums::{Country, WineType};

/// Wine entity - root of the wine aggregate.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "wine")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display name, never blank.
    pub name: String,

    pub winery: Option<String>,

    pub wine_type: Option<WineType>,

    /// Denomination of origin.
    pub do_id: Option<i32>,

    /// Equal to the denomination's country whenever both are set.
    pub country: Option<Country>,

    pub aging_type: Option<String>,

    /// 1800..=2200 when set.
    pub vintage_year: Option<i32>,

    /// 0..=100 when set.
    #[sea_orm(column_type = "Double", nullable)]
    pub alcohol_percentage: Option<f64>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::denomination::Entity",
        from = "Column::DoId",
        to = "super::denomination::Column::Id"
    )]
    Denomination,
    #[sea_orm(has_many = "super::wine_grape::Entity")]
    WineGrapes,
    #[sea_orm(has_many = "super::wine_purchase::Entity")]
    WinePurchases,
    #[sea_orm(has_many = "super::wine_award::Entity")]
    WineAwards,
    #[sea_orm(has_many = "super::wine_photo::Entity")]
    WinePhotos,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::denomination::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Denomination.def()
    }
}

impl Related<super::wine_grape::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WineGrapes.def()
    }
}

impl Related<super::wine_purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WinePurchases.def()
    }
}

impl Related<super::wine_award::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WineAwards.def()
    }
}

impl Related<super::wine_photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WinePhotos.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
