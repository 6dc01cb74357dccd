use std::collections::HashSet;

use cellar_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use super::check_score;

/// Tasting note tag attached to a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewBullet {
    Fruity,
    Floral,
    Spicy,
    Mineral,
    OakForward,
    EasyDrinking,
    Elegant,
    Powerful,
    FoodFriendly,
}

impl ReviewBullet {
    /// Stored form of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fruity => "fruity",
            Self::Floral => "floral",
            Self::Spicy => "spicy",
            Self::Mineral => "mineral",
            Self::OakForward => "oak_forward",
            Self::EasyDrinking => "easy_drinking",
            Self::Elegant => "elegant",
            Self::Powerful => "powerful",
            Self::FoodFriendly => "food_friendly",
        }
    }

    /// Parse a stored tag, translating the older vocabulary.
    ///
    /// Unknown values are an internal error: the table only ever receives
    /// values written through [`Self::as_str`].
    pub fn from_stored(value: &str) -> AppResult<Self> {
        let bullet = match value {
            "fruity" | "fruit_forward" => Self::Fruity,
            "floral" | "flowery" => Self::Floral,
            "spicy" | "spice" => Self::Spicy,
            "mineral" | "minerality" => Self::Mineral,
            "oak_forward" | "oaky" => Self::OakForward,
            "easy_drinking" | "light" => Self::EasyDrinking,
            "elegant" | "smooth" => Self::Elegant,
            "powerful" | "full_bodied" => Self::Powerful,
            "food_friendly" | "pairs_well" => Self::FoodFriendly,
            other => {
                return Err(AppError::Internal(format!(
                    "Unknown review bullet in storage: {other}"
                )));
            }
        };
        Ok(bullet)
    }
}

/// Upper bound of every tasting axis.
pub const MAX_AXIS: i16 = 5;

/// Scores of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewScores {
    pub score: Option<i32>,
    pub intensity_aroma: i16,
    pub sweetness: i16,
    pub acidity: i16,
    /// Not every wine has noticeable tannin.
    pub tannin: Option<i16>,
    pub body: i16,
    pub persistence: i16,
}

fn check_axis(field: &str, value: i16) -> AppResult<i16> {
    if (0..=MAX_AXIS).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::validation(
            field,
            format!("must be between 0 and {MAX_AXIS}"),
        ))
    }
}

impl ReviewScores {
    pub fn new(
        score: Option<i32>,
        intensity_aroma: i16,
        sweetness: i16,
        acidity: i16,
        tannin: Option<i16>,
        body: i16,
        persistence: i16,
    ) -> AppResult<Self> {
        Ok(Self {
            score: check_score("score", score)?,
            intensity_aroma: check_axis("intensity_aroma", intensity_aroma)?,
            sweetness: check_axis("sweetness", sweetness)?,
            acidity: check_axis("acidity", acidity)?,
            tannin: tannin.map(|t| check_axis("tannin", t)).transpose()?,
            body: check_axis("body", body)?,
            persistence: check_axis("persistence", persistence)?,
        })
    }
}

/// Validated review content: scores plus a duplicate-free bullet set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSheet {
    pub scores: ReviewScores,
    pub bullets: Vec<ReviewBullet>,
}

impl ReviewSheet {
    pub fn new(scores: ReviewScores, bullets: Vec<ReviewBullet>) -> AppResult<Self> {
        let mut seen = HashSet::with_capacity(bullets.len());
        if let Some(dup) = bullets.iter().find(|b| !seen.insert(**b)) {
            return Err(AppError::validation(
                "bullets",
                format!("{} is listed more than once", dup.as_str()),
            ));
        }
        Ok(Self { scores, bullets })
    }

    /// Bullets in stored form.
    #[must_use]
    pub fn stored_bullets(&self) -> Vec<String> {
        self.bullets.iter().map(|b| b.as_str().to_string()).collect()
    }
}
