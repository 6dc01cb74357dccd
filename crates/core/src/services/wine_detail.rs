//! Full nested view of a single wine.
//!
//! The parts are read with separate queries and are not isolated from each other.

use std::collections::HashMap;

use cellar_common::{AppError, AppResult};
use cellar_db::entities::{
    GrapeColor, denomination, place, review, wine, wine_award, wine_photo,
};
use cellar_db::repositories::{PhotoRepository, ReviewRepository, WineRepository};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use tracing::debug;

use crate::domain::ReviewBullet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WineGrapeDetail {
    pub grape_id: i32,
    pub name: String,
    pub color: GrapeColor,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseDetail {
    pub id: i32,
    pub price_paid: f64,
    pub purchased_at: DateTimeWithTimeZone,
    pub place: place::Model,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDetail {
    #[serde(flatten)]
    pub review: review::Model,
    /// Display name of the author.
    pub author: String,
    pub bullets: Vec<ReviewBullet>,
}

/// A wine with everything attached to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WineDetail {
    #[serde(flatten)]
    pub wine: wine::Model,
    pub origin: Option<denomination::Model>,
    pub grapes: Vec<WineGrapeDetail>,
    pub purchases: Vec<PurchaseDetail>,
    pub awards: Vec<wine_award::Model>,
    pub photos: Vec<wine_photo::Model>,
    pub reviews: Vec<ReviewDetail>,
}

/// Translate stored bullets, dropping duplicates produced by the legacy mapping.
pub(crate) fn translate_bullets<'a>(
    stored: impl IntoIterator<Item = &'a str>,
) -> AppResult<Vec<ReviewBullet>> {
    let mut bullets: Vec<ReviewBullet> = Vec::new();
    for value in stored {
        let bullet = ReviewBullet::from_stored(value)?;
        if !bullets.contains(&bullet) {
            bullets.push(bullet);
        }
    }
    Ok(bullets)
}

/// Loads a wine and all related collections.
#[derive(Clone)]
pub struct WineDetailAssembler {
    wine_repo: WineRepository,
    photo_repo: PhotoRepository,
    review_repo: ReviewRepository,
}

impl WineDetailAssembler {
    /// Create a new detail assembler.
    #[must_use]
    pub const fn new(
        wine_repo: WineRepository,
        photo_repo: PhotoRepository,
        review_repo: ReviewRepository,
    ) -> Self {
        Self {
            wine_repo,
            photo_repo,
            review_repo,
        }
    }

    /// Load the full view of a wine.
    pub async fn get(&self, id: i32) -> AppResult<WineDetail> {
        let (wine, origin) = self
            .wine_repo
            .find_with_origin(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Wine {id} not found")))?;

        let grapes = self
            .wine_repo
            .find_grapes(id)
            .await?
            .into_iter()
            .map(|(link, grape)| {
                let grape = grape.ok_or_else(|| {
                    AppError::Internal(format!("Grape {} of wine {id} is missing", link.grape_id))
                })?;
                Ok(WineGrapeDetail {
                    grape_id: link.grape_id,
                    name: grape.name,
                    color: grape.color,
                    percentage: link.percentage,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let purchases = self
            .wine_repo
            .find_purchases(id)
            .await?
            .into_iter()
            .map(|(purchase, place)| {
                let place = place.ok_or_else(|| {
                    AppError::Internal(format!("Place of purchase {} is missing", purchase.id))
                })?;
                Ok(PurchaseDetail {
                    id: purchase.id,
                    price_paid: purchase.price_paid,
                    purchased_at: purchase.purchased_at,
                    place,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let awards = self.wine_repo.find_awards(id).await?;
        let photos = self.photo_repo.find_by_wine(id).await?;
        let reviews = self.load_reviews(id).await?;

        debug!(
            wine_id = id,
            grapes = grapes.len(),
            purchases = purchases.len(),
            reviews = reviews.len(),
            "Assembled wine detail"
        );

        Ok(WineDetail {
            wine,
            origin,
            grapes,
            purchases,
            awards,
            photos,
            reviews,
        })
    }

    async fn load_reviews(&self, wine_id: i32) -> AppResult<Vec<ReviewDetail>> {
        let rows = self.review_repo.find_by_wine_with_user(wine_id).await?;
        let ids: Vec<i32> = rows.iter().map(|(r, _)| r.id).collect();

        let mut stored: HashMap<i32, Vec<String>> = HashMap::new();
        for row in self.review_repo.find_bullets(&ids).await? {
            stored.entry(row.review_id).or_default().push(row.bullet);
        }

        rows.into_iter()
            .map(|(review, user)| {
                let bullets = translate_bullets(
                    stored
                        .get(&review.id)
                        .into_iter()
                        .flatten()
                        .map(String::as_str),
                )?;
                let author = user.map_or_else(
                    || format!("user {}", review.user_id),
                    |u| u.shown_name().to_string(),
                );
                Ok(ReviewDetail {
                    review,
                    author,
                    bullets,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cellar_db::entities::{
        AwardName, Country, PhotoType, PlaceType, WineType, grape, review_bullet, user,
        wine_grape, wine_purchase,
    };
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn at(day: u32) -> DateTimeWithTimeZone {
        Utc.with_ymd_and_hms(2026, 2, day, 10, 0, 0).unwrap().into()
    }

    fn test_wine() -> wine::Model {
        wine::Model {
            id: 10,
            name: "Mencía".to_string(),
            winery: Some("Raúl Pérez".to_string()),
            wine_type: Some(WineType::Red),
            do_id: Some(9),
            country: Some(Country::Spain),
            aging_type: None,
            vintage_year: Some(2022),
            alcohol_percentage: Some(13.0),
            created_at: at(1),
            updated_at: at(1),
        }
    }

    fn test_origin() -> denomination::Model {
        denomination::Model {
            id: 9,
            name: "Bierzo".to_string(),
            region: "Castilla y León".to_string(),
            country: Country::Spain,
            country_code: "ES".to_string(),
        }
    }

    fn test_review(id: i32, user_id: i32) -> review::Model {
        review::Model {
            id,
            user_id,
            wine_id: 10,
            score: Some(90),
            intensity_aroma: 4,
            sweetness: 0,
            acidity: 3,
            tannin: Some(2),
            body: 3,
            persistence: 4,
            created_at: at(20),
        }
    }

    fn test_user(id: i32, username: &str, display_name: Option<&str>) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            display_name: display_name.map(ToString::to_string),
            created_at: at(1),
        }
    }

    fn bullet(review_id: i32, value: &str) -> review_bullet::Model {
        review_bullet::Model {
            review_id,
            bullet: value.to_string(),
        }
    }

    fn assembler(db: MockDatabase) -> WineDetailAssembler {
        let db = Arc::new(db.into_connection());
        WineDetailAssembler::new(
            WineRepository::new(Arc::clone(&db)),
            PhotoRepository::new(Arc::clone(&db)),
            ReviewRepository::new(db),
        )
    }

    #[test]
    fn test_translate_bullets_maps_legacy_and_dedups() {
        let bullets = translate_bullets(["oaky", "fruity", "oak_forward", "smooth"]).unwrap();

        assert_eq!(
            bullets,
            vec![
                ReviewBullet::OakForward,
                ReviewBullet::Fruity,
                ReviewBullet::Elegant
            ]
        );
    }

    #[test]
    fn test_translate_bullets_fails_closed() {
        assert!(translate_bullets(["fruity", "buttery"]).is_err());
    }

    #[tokio::test]
    async fn test_missing_wine() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<(wine::Model, denomination::Model)>::new()]);

        let err = assembler(db).get(10).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_assembles_all_parts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[(test_wine(), test_origin())]])
            .append_query_results([[(
                wine_grape::Model {
                    wine_id: 10,
                    grape_id: 2,
                    percentage: Some(100.0),
                },
                grape::Model {
                    id: 2,
                    name: "Mencía".to_string(),
                    color: GrapeColor::Red,
                },
            )]])
            .append_query_results([[(
                wine_purchase::Model {
                    id: 4,
                    wine_id: 10,
                    place_id: 3,
                    price_paid: 19.99,
                    purchased_at: at(28),
                    created_at: at(28),
                },
                place::Model {
                    id: 3,
                    place_type: PlaceType::Restaurant,
                    name: "Casa Paco".to_string(),
                    address: Some("Calle A".to_string()),
                    city: Some("Madrid".to_string()),
                    country: Country::Spain,
                },
            )]])
            .append_query_results([[wine_award::Model {
                id: 1,
                wine_id: 10,
                name: AwardName::Penin,
                score: Some(92),
                year: Some(2024),
            }]])
            .append_query_results([[wine_photo::Model {
                id: 6,
                wine_id: 10,
                url: "/photos/10/0123456789abcdef.jpg".to_string(),
                photo_type: Some(PhotoType::FrontLabel),
                hash: "0123456789abcdef".to_string(),
                size: 2048,
                extension: "jpg".to_string(),
            }]])
            .append_query_results([[
                (test_review(8, 1), test_user(1, "ana", Some("Ana G."))),
                (test_review(7, 2), test_user(2, "luis", None)),
            ]])
            .append_query_results([[
                bullet(7, "fruit_forward"),
                bullet(8, "elegant"),
                bullet(8, "mineral"),
            ]]);

        let detail = assembler(db).get(10).await.unwrap();

        assert_eq!(detail.wine.name, "Mencía");
        assert_eq!(detail.origin.unwrap().name, "Bierzo");
        assert_eq!(detail.grapes.len(), 1);
        assert_eq!(detail.grapes[0].percentage, Some(100.0));
        assert_eq!(detail.purchases.len(), 1);
        assert_eq!(detail.purchases[0].place.name, "Casa Paco");
        assert_eq!(detail.awards.len(), 1);
        assert_eq!(detail.photos.len(), 1);
        assert_eq!(detail.reviews.len(), 2);
        assert_eq!(detail.reviews[0].author, "Ana G.");
        assert_eq!(
            detail.reviews[0].bullets,
            vec![ReviewBullet::Elegant, ReviewBullet::Mineral]
        );
        assert_eq!(detail.reviews[1].author, "luis");
        assert_eq!(detail.reviews[1].bullets, vec![ReviewBullet::Fruity]);
    }
}
