//! Place entity - where a purchase happened.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::sea_orm_active_enums::{Country, PlaceType};

/// A shop or restaurant. One row is created per purchase.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "place")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub place_type: PlaceType,

    pub name: String,

    /// Required for restaurants, absent for supermarkets.
    pub address: Option<String>,

    /// Required for restaurants.
    pub city: Option<String>,

    pub country: Country,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wine_purchase::Entity")]
    WinePurchases,
}

impl Related<super::wine_purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WinePurchases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
