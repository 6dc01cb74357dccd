//! Filtered, sorted and paginated wine listing.
//!
//! Predicates are added to a `Condition` only for the filters that were supplied,
//! so every user value ends up as a bound parameter.

use cellar_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    sea_query::{Expr, Func, LikeExpr, NullOrdering, Query, SimpleExpr},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::{
    Country, Denomination, Wine, WineGrape, WineType, denomination, wine, wine_grape,
};

use super::WineRepository;

/// Average of the non-null review scores of the outer wine row.
const AVG_SCORE_SQL: &str = r#"(SELECT AVG(r.score)::float8 FROM review r WHERE r.wine_id = "wine"."id" AND r.score IS NOT NULL)"#;

const REVIEW_COUNT_SQL: &str = r#"(SELECT COUNT(*) FROM review r WHERE r.wine_id = "wine"."id")"#;

/// Column a listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WineSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    VintageYear,
    /// Average review score, recomputed per query.
    Score,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

/// Bounds on the average review score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Treat `max` as an exclusive upper bound.
    pub max_exclusive: bool,
}

impl ScoreRange {
    /// Whether no bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Listing request, already validated by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct WineListFilter {
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
    pub wine_type: Option<WineType>,
    pub country: Option<Country>,
    pub do_id: Option<i32>,
    pub grape_id: Option<i32>,
    pub score: ScoreRange,
    pub sort_by: WineSortField,
    pub sort_dir: SortDirection,
}

impl Default for WineListFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
            wine_type: None,
            country: None,
            do_id: None,
            grape_id: None,
            score: ScoreRange::default(),
            sort_by: WineSortField::default(),
            sort_dir: SortDirection::default(),
        }
    }
}

impl WineListFilter {
    /// Number of rows skipped before the requested page.
    ///
    /// Fails when the offset does not fit a signed 64-bit SQL parameter.
    pub fn offset(&self) -> AppResult<u64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.limit)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::validation("page", "is too large"))
    }
}

/// One row of a wine listing.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize)]
pub struct WineListRow {
    pub id: i32,
    pub name: String,
    pub winery: Option<String>,
    pub wine_type: Option<WineType>,
    pub do_id: Option<i32>,
    pub country: Option<Country>,
    pub aging_type: Option<String>,
    pub vintage_year: Option<i32>,
    pub alcohol_percentage: Option<f64>,
    pub created_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub updated_at: sea_orm::prelude::DateTimeWithTimeZone,
    pub do_name: Option<String>,
    pub do_region: Option<String>,
    pub avg_score: Option<f64>,
    pub review_count: i64,
}

fn avg_score_expr() -> SimpleExpr {
    Expr::cust(AVG_SCORE_SQL)
}

/// Escape LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn lower_like(column: SimpleExpr, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(column)).like(LikeExpr::new(pattern).escape('\\'))
}

fn filter_condition(filter: &WineListFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(term) = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
    {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        condition = condition.add(
            Condition::any()
                .add(lower_like(Expr::col((Wine, wine::Column::Name)).into(), &pattern))
                .add(lower_like(Expr::col((Wine, wine::Column::Winery)).into(), &pattern))
                .add(lower_like(
                    Expr::col((Denomination, denomination::Column::Name)).into(),
                    &pattern,
                ))
                .add(lower_like(
                    Expr::col((Denomination, denomination::Column::Region)).into(),
                    &pattern,
                )),
        );
    }

    if let Some(wine_type) = filter.wine_type {
        condition = condition.add(wine::Column::WineType.eq(wine_type));
    }

    if let Some(country) = filter.country {
        condition = condition.add(wine::Column::Country.eq(country));
    }

    if let Some(do_id) = filter.do_id {
        condition = condition.add(wine::Column::DoId.eq(do_id));
    }

    if let Some(grape_id) = filter.grape_id {
        condition = condition.add(Expr::exists(
            Query::select()
                .expr(Expr::val(1))
                .from(WineGrape)
                .and_where(
                    Expr::col((WineGrape, wine_grape::Column::WineId))
                        .equals((Wine, wine::Column::Id)),
                )
                .and_where(Expr::col((WineGrape, wine_grape::Column::GrapeId)).eq(grape_id))
                .to_owned(),
        ));
    }

    if let Some(min) = filter.score.min {
        condition = condition.add(Expr::expr(avg_score_expr()).gte(min));
    }

    if let Some(max) = filter.score.max {
        let bound = Expr::expr(avg_score_expr());
        condition = condition.add(if filter.score.max_exclusive {
            bound.lt(max)
        } else {
            bound.lte(max)
        });
    }

    condition
}

/// Unordered, unpaginated select of the filtered join.
fn filtered_select(filter: &WineListFilter) -> Select<Wine> {
    Wine::find()
        .join(JoinType::LeftJoin, wine::Relation::Denomination.def())
        .column_as(denomination::Column::Name, "do_name")
        .column_as(denomination::Column::Region, "do_region")
        .column_as(avg_score_expr(), "avg_score")
        .column_as(Expr::cust(REVIEW_COUNT_SQL), "review_count")
        .filter(filter_condition(filter))
}

/// Full listing select: filtered and ordered, without pagination.
pub fn build_list_select(filter: &WineListFilter) -> Select<Wine> {
    let sort_expr: SimpleExpr = match filter.sort_by {
        WineSortField::CreatedAt => Expr::col((Wine, wine::Column::CreatedAt)).into(),
        WineSortField::UpdatedAt => Expr::col((Wine, wine::Column::UpdatedAt)).into(),
        WineSortField::Name => Expr::col((Wine, wine::Column::Name)).into(),
        WineSortField::VintageYear => Expr::col((Wine, wine::Column::VintageYear)).into(),
        WineSortField::Score => avg_score_expr(),
    };

    filtered_select(filter)
        .order_by_with_nulls(sort_expr, filter.sort_dir.into(), NullOrdering::Last)
        .order_by_desc(wine::Column::Id)
}

impl WineRepository {
    /// List one page of wines. Returns the rows and the total number of matches.
    pub async fn list(&self, filter: &WineListFilter) -> AppResult<(Vec<WineListRow>, u64)> {
        let db: &DatabaseConnection = self.db.as_ref();
        let offset = filter.offset()?;

        let total = filtered_select(filter)
            .count(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        debug!(total, page = filter.page, limit = filter.limit, "Listing wines");

        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let rows = build_list_select(filter)
            .offset(offset)
            .limit(filter.limit)
            .into_model::<WineListRow>()
            .all(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((rows, total))
    }
}
