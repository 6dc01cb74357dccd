//! Review entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A user's tasting review. Unique per (user, wine).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub wine_id: i32,

    /// Overall score, 0..=100.
    pub score: Option<i32>,

    // Tasting axes, each 0..=5.
    pub intensity_aroma: i16,
    pub sweetness: i16,
    pub acidity: i16,
    pub tannin: Option<i16>,
    pub body: i16,
    pub persistence: i16,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::wine::Entity",
        from = "Column::WineId",
        to = "super::wine::Column::Id",
        on_delete = "Cascade"
    )]
    Wine,
    #[sea_orm(has_many = "super::review_bullet::Entity")]
    Bullets,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::wine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wine.def()
    }
}

impl Related<super::review_bullet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bullets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
