//! Value objects of the wine catalog.
//!
//! Every constructor validates its input and fails with
//! [`AppError::Validation`](cellar_common::AppError::Validation) naming the
//! offending field. Services build these before touching the database.

#![allow(missing_docs)]

mod purchase;
mod review;
mod wine;

pub use purchase::{Award, PlaceSpec, Purchase};
pub use review::{ReviewBullet, ReviewScores, ReviewSheet};
pub use wine::{
    GrapeLink, MAX_AGING_TYPE_LEN, MAX_WINERY_LEN, WineFields, check_distinct_grapes, check_name,
};

use cellar_common::{AppError, AppResult};

/// Earliest accepted vintage or award year.
pub const MIN_YEAR: i32 = 1800;
/// Latest accepted vintage or award year.
pub const MAX_YEAR: i32 = 2200;

/// Check an optional year against [`MIN_YEAR`]..=[`MAX_YEAR`].
pub fn check_year(field: &str, year: Option<i32>) -> AppResult<Option<i32>> {
    match year {
        Some(y) if !(MIN_YEAR..=MAX_YEAR).contains(&y) => Err(AppError::validation(
            field,
            format!("must be between {MIN_YEAR} and {MAX_YEAR}"),
        )),
        _ => Ok(year),
    }
}

/// Check an optional percentage against 0..=100.
pub fn check_percentage(field: &str, value: Option<f64>) -> AppResult<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || !(0.0..=100.0).contains(&v) => {
            Err(AppError::validation(field, "must be between 0 and 100"))
        }
        _ => Ok(value),
    }
}

/// Check an optional 0..=100 integer score.
pub fn check_score(field: &str, score: Option<i32>) -> AppResult<Option<i32>> {
    match score {
        Some(s) if !(0..=100).contains(&s) => {
            Err(AppError::validation(field, "must be between 0 and 100"))
        }
        _ => Ok(score),
    }
}

/// Trim an optional text field, mapping blank to `None`.
#[must_use]
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalize an optional text field and reject values longer than `max` characters.
pub fn check_text(field: &str, value: Option<String>, max: usize) -> AppResult<Option<String>> {
    let value = normalize_text(value);
    match &value {
        Some(v) if v.chars().count() > max => Err(AppError::validation(
            field,
            format!("must be at most {max} characters"),
        )),
        _ => Ok(value),
    }
}
