//! Database entities.

#![allow(missing_docs)]

pub mod denomination;
pub mod grape;
pub mod place;
pub mod review;
pub mod review_bullet;
pub mod sea_orm_active_enums;
pub mod user;
pub mod wine;
pub mod wine_award;
pub mod wine_grape;
pub mod wine_photo;
pub mod wine_purchase;

pub use denomination::Entity as Denomination;
pub use grape::Entity as Grape;
pub use place::Entity as Place;
pub use review::Entity as Review;
pub use review_bullet::Entity as ReviewBullet;
pub use sea_orm_active_enums::{AwardName, Country, GrapeColor, PhotoType, PlaceType, WineType};
pub use user::Entity as User;
pub use wine::Entity as Wine;
pub use wine_award::Entity as WineAward;
pub use wine_grape::Entity as WineGrape;
pub use wine_photo::Entity as WinePhoto;
pub use wine_purchase::Entity as WinePurchase;
