//! Review service.

use cellar_common::{AppError, AppResult};
use cellar_db::entities::review;
use cellar_db::repositories::{ReviewRepository, WineRepository};
use chrono::Utc;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{ReviewBullet, ReviewScores, ReviewSheet};

use super::wine_detail::translate_bullets;

/// Review content as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub score: Option<i32>,
    pub intensity_aroma: i16,
    pub sweetness: i16,
    pub acidity: i16,
    pub tannin: Option<i16>,
    pub body: i16,
    pub persistence: i16,
    #[serde(default)]
    pub bullets: Vec<ReviewBullet>,
}

impl ReviewInput {
    fn into_sheet(self) -> AppResult<ReviewSheet> {
        let scores = ReviewScores::new(
            self.score,
            self.intensity_aroma,
            self.sweetness,
            self.acidity,
            self.tannin,
            self.body,
            self.persistence,
        )?;
        ReviewSheet::new(scores, self.bullets)
    }
}

/// A review with its translated bullets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewWithBullets {
    #[serde(flatten)]
    pub review: review::Model,
    pub bullets: Vec<ReviewBullet>,
}

fn score_columns(scores: &ReviewScores) -> review::ActiveModel {
    review::ActiveModel {
        id: NotSet,
        user_id: NotSet,
        wine_id: NotSet,
        score: Set(scores.score),
        intensity_aroma: Set(scores.intensity_aroma),
        sweetness: Set(scores.sweetness),
        acidity: Set(scores.acidity),
        tannin: Set(scores.tannin),
        body: Set(scores.body),
        persistence: Set(scores.persistence),
        created_at: NotSet,
    }
}

/// Service for managing reviews. One review per user and wine.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    wine_repo: WineRepository,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(review_repo: ReviewRepository, wine_repo: WineRepository) -> Self {
        Self {
            review_repo,
            wine_repo,
        }
    }

    /// Create a review. Returns the new review id.
    pub async fn create(&self, user_id: i32, wine_id: i32, input: ReviewInput) -> AppResult<i32> {
        let sheet = input.into_sheet()?;

        if self.wine_repo.find_by_id(wine_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Wine {wine_id} not found")));
        }

        if self
            .review_repo
            .find_by_user_and_wine(user_id, wine_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "Review for this user and wine already exists".to_string(),
            ));
        }

        let mut model = score_columns(&sheet.scores);
        model.user_id = Set(user_id);
        model.wine_id = Set(wine_id);
        model.created_at = Set(Utc::now().fixed_offset());

        let review_id = self
            .review_repo
            .create(model, sheet.stored_bullets())
            .await?;

        info!(review_id, user_id, wine_id, "Created review");
        Ok(review_id)
    }

    /// Replace a review's scores and bullets.
    pub async fn update(&self, id: i32, input: ReviewInput) -> AppResult<()> {
        let sheet = input.into_sheet()?;

        let existed = self
            .review_repo
            .update(id, score_columns(&sheet.scores), sheet.stored_bullets())
            .await?;

        if !existed {
            return Err(AppError::NotFound(format!("Review {id} not found")));
        }

        info!(review_id = id, "Updated review");
        Ok(())
    }

    /// Delete a review and its bullets.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.review_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Review {id} not found")));
        }
        info!(review_id = id, "Deleted review");
        Ok(())
    }

    /// Fetch a review with its translated bullets.
    pub async fn get(&self, id: i32) -> AppResult<ReviewWithBullets> {
        let review = self
            .review_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {id} not found")))?;

        let stored = self.review_repo.find_bullets(&[id]).await?;
        let bullets = translate_bullets(stored.iter().map(|b| b.bullet.as_str()))?;

        Ok(ReviewWithBullets { review, bullets })
    }
}
