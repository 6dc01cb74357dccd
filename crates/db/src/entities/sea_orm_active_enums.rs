//! Closed vocabularies stored as strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Style of wine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum WineType {
    #[sea_orm(string_value = "red")]
    Red,
    #[sea_orm(string_value = "white")]
    White,
    #[sea_orm(string_value = "rose")]
    Rose,
    #[sea_orm(string_value = "sparkling")]
    Sparkling,
    #[sea_orm(string_value = "sweet")]
    Sweet,
    #[sea_orm(string_value = "fortified")]
    Fortified,
}

/// Producing country of a wine, denomination or place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum Country {
    #[sea_orm(string_value = "spain")]
    Spain,
    #[sea_orm(string_value = "france")]
    France,
    #[sea_orm(string_value = "italy")]
    Italy,
    #[sea_orm(string_value = "portugal")]
    Portugal,
    #[sea_orm(string_value = "germany")]
    Germany,
    #[sea_orm(string_value = "austria")]
    Austria,
    #[sea_orm(string_value = "argentina")]
    Argentina,
    #[sea_orm(string_value = "chile")]
    Chile,
    #[sea_orm(string_value = "usa")]
    Usa,
    #[sea_orm(string_value = "australia")]
    Australia,
    #[sea_orm(string_value = "new_zealand")]
    NewZealand,
    #[sea_orm(string_value = "south_africa")]
    SouthAfrica,
}

/// Skin color of a grape variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum GrapeColor {
    #[sea_orm(string_value = "red")]
    Red,
    #[sea_orm(string_value = "white")]
    White,
}

/// Where a bottle was bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    #[sea_orm(string_value = "supermarket")]
    Supermarket,
    #[sea_orm(string_value = "restaurant")]
    Restaurant,
}

/// Guide or competition that scored a wine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AwardName {
    #[sea_orm(string_value = "penin")]
    Penin,
    #[sea_orm(string_value = "parker")]
    Parker,
    #[sea_orm(string_value = "decanter")]
    Decanter,
    #[sea_orm(string_value = "wine_spectator")]
    WineSpectator,
    #[sea_orm(string_value = "james_suckling")]
    JamesSuckling,
    #[sea_orm(string_value = "tim_atkin")]
    TimAtkin,
    #[sea_orm(string_value = "guia_proensa")]
    GuiaProensa,
}

/// What a wine photo shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PhotoType {
    #[sea_orm(string_value = "front_label")]
    FrontLabel,
    #[sea_orm(string_value = "back_label")]
    BackLabel,
    #[sea_orm(string_value = "bottle")]
    Bottle,
}
