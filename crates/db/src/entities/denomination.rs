//! Denomination of origin entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::sea_orm_active_enums::Country;

/// A protected regional designation (the `do` table).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "do")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Denomination name, unique per country.
    pub name: String,

    pub region: String,

    pub country: Country,

    /// ISO 3166-1 alpha-2 code.
    pub country_code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wine::Entity")]
    Wines,
}

impl Related<super::wine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
