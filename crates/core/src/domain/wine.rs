use std::collections::HashSet;

use cellar_common::{AppError, AppResult};
use cellar_db::entities::WineType;

use super::{check_percentage, check_text, check_year};

const MAX_NAME_LEN: usize = 200;
/// Longest accepted winery name.
pub const MAX_WINERY_LEN: usize = 200;
/// Longest accepted aging type; the column holds 64 characters.
pub const MAX_AGING_TYPE_LEN: usize = 64;

/// Trim a wine name and reject blank or overlong values.
pub fn check_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("name", "must not be blank"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(
            "name",
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Scalar columns of a wine, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct WineFields {
    pub name: String,
    pub winery: Option<String>,
    pub wine_type: Option<WineType>,
    pub aging_type: Option<String>,
    pub vintage_year: Option<i32>,
    pub alcohol_percentage: Option<f64>,
}

impl WineFields {
    pub fn new(
        name: &str,
        winery: Option<String>,
        wine_type: Option<WineType>,
        aging_type: Option<String>,
        vintage_year: Option<i32>,
        alcohol_percentage: Option<f64>,
    ) -> AppResult<Self> {
        Ok(Self {
            name: check_name(name)?,
            winery: check_text("winery", winery, MAX_WINERY_LEN)?,
            wine_type,
            aging_type: check_text("aging_type", aging_type, MAX_AGING_TYPE_LEN)?,
            vintage_year: check_year("vintage_year", vintage_year)?,
            alcohol_percentage: check_percentage("alcohol_percentage", alcohol_percentage)?,
        })
    }
}

/// Share of a grape in a wine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrapeLink {
    pub grape_id: i32,
    pub percentage: Option<f64>,
}

impl GrapeLink {
    pub fn new(grape_id: i32, percentage: Option<f64>) -> AppResult<Self> {
        if grape_id < 1 {
            return Err(AppError::validation("grapes.grape_id", "must be a positive id"));
        }
        Ok(Self {
            grape_id,
            percentage: check_percentage("grapes.percentage", percentage)?,
        })
    }
}

/// Reject a grape list naming the same grape twice.
pub fn check_distinct_grapes(links: &[GrapeLink]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(links.len());
    for link in links {
        if !seen.insert(link.grape_id) {
            return Err(AppError::validation(
                "grapes",
                format!("grape {} is listed more than once", link.grape_id),
            ));
        }
    }
    Ok(())
}
