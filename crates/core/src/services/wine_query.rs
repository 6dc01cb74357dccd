//! Wine listing query parameters and result page.

use cellar_common::{AppError, AppResult};
use cellar_db::entities::{Country, WineType};
use cellar_db::repositories::{
    ScoreRange, SortDirection, WineListFilter, WineListRow, WineSortField,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Named average-score ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBucket {
    #[default]
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "lt70")]
    Below70,
    #[serde(rename = "70-80")]
    From70To80,
    #[serde(rename = "80-90")]
    From80To90,
    #[serde(rename = "90+")]
    From90,
}

impl ScoreBucket {
    /// Half-open `[min, max)` range of the bucket.
    #[must_use]
    pub const fn range(self) -> ScoreRange {
        let (min, max) = match self {
            Self::Any => (None, None),
            Self::Below70 => (None, Some(70.0)),
            Self::From70To80 => (Some(70.0), Some(80.0)),
            Self::From80To90 => (Some(80.0), Some(90.0)),
            Self::From90 => (Some(90.0), None),
        };
        ScoreRange {
            min,
            max,
            max_exclusive: true,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

/// Query parameters for listing wines.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListWinesQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    #[validate(length(max = 200))]
    pub search: Option<String>,
    pub wine_type: Option<WineType>,
    pub country: Option<Country>,
    pub do_id: Option<i32>,
    pub grape_id: Option<i32>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub score_min: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub score_max: Option<f64>,
    /// Used only when neither `score_min` nor `score_max` is given.
    pub score: Option<ScoreBucket>,
    #[serde(default)]
    pub sort_by: WineSortField,
    #[serde(default)]
    pub sort_dir: SortDirection,
}

impl Default for ListWinesQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            wine_type: None,
            country: None,
            do_id: None,
            grape_id: None,
            score_min: None,
            score_max: None,
            score: None,
            sort_by: WineSortField::default(),
            sort_dir: SortDirection::default(),
        }
    }
}

impl ListWinesQuery {
    /// Validate and turn into a repository filter.
    pub fn into_filter(self) -> AppResult<WineListFilter> {
        self.validate()?;

        for (field, bound) in [("score_min", self.score_min), ("score_max", self.score_max)] {
            if bound.is_some_and(|b| !b.is_finite()) {
                return Err(AppError::validation(field, "must be a finite number"));
            }
        }

        if let (Some(min), Some(max)) = (self.score_min, self.score_max)
            && min > max
        {
            return Err(AppError::validation(
                "score_min",
                "must not be greater than score_max",
            ));
        }

        let explicit = ScoreRange {
            min: self.score_min,
            max: self.score_max,
            max_exclusive: false,
        };
        let score = if explicit.is_unbounded() {
            self.score.unwrap_or_default().range()
        } else {
            explicit
        };

        let filter = WineListFilter {
            page: self.page,
            limit: self.limit,
            search: self.search,
            wine_type: self.wine_type,
            country: self.country,
            do_id: self.do_id,
            grape_id: self.grape_id,
            score,
            sort_by: self.sort_by,
            sort_dir: self.sort_dir,
        };
        filter.offset()?;
        Ok(filter)
    }
}

/// Number of pages needed for `total` items; zero when there are none.
#[must_use]
pub const fn total_pages(total: u64, limit: u64) -> u64 {
    if total == 0 || limit == 0 {
        0
    } else {
        total.div_ceil(limit)
    }
}

/// One page of a wine listing.
#[derive(Debug, Clone, Serialize)]
pub struct WinePage {
    pub items: Vec<WineListRow>,
    pub page: u64,
    pub limit: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl WinePage {
    /// Wrap a page of rows with its paging metadata.
    #[must_use]
    pub const fn new(items: Vec<WineListRow>, page: u64, limit: u64, total_items: u64) -> Self {
        Self {
            items,
            page,
            limit,
            total_items,
            total_pages: total_pages(total_items, limit),
        }
    }
}
