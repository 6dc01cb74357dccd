//! Wine repository.
//!
//! Aggregate writes (wine plus grape links, purchases and awards) run inside a
//! single transaction; dropping the transaction on an early return rolls it back.

use std::sync::Arc;

use cellar_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    Set, TransactionTrait, Value,
    sea_query::{Expr, NullOrdering, Query, SimpleExpr},
};
use tracing::debug;

use crate::entities::{
    Denomination, Grape, Place, Wine, WineAward, WineGrape, WinePurchase, denomination, grape,
    place, wine, wine_award, wine_grape, wine_purchase,
};

/// A purchase to insert together with the place it happened at.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    /// Place row; created per purchase.
    pub place: place::ActiveModel,
    /// Purchase row; `wine_id` and `place_id` are filled in on insert.
    pub purchase: wine_purchase::ActiveModel,
}

/// Everything inserted when a wine is created.
///
/// `wine_id` on the child rows is ignored and set to the new wine's id.
#[derive(Debug, Clone)]
pub struct WineAggregate {
    /// Wine row.
    pub wine: wine::ActiveModel,
    /// Grape links.
    pub grapes: Vec<wine_grape::ActiveModel>,
    /// Purchases with their places.
    pub purchases: Vec<NewPurchase>,
    /// Awards.
    pub awards: Vec<wine_award::ActiveModel>,
}

/// Repository for wine aggregate operations.
#[derive(Clone)]
pub struct WineRepository {
    pub(super) db: Arc<DatabaseConnection>,
}

impl WineRepository {
    /// Create a new wine repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ==================== Wine Operations ====================

    /// Find wine by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<wine::Model>> {
        Wine::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a wine and all of its owned rows. Returns the new wine id.
    pub async fn create_aggregate(&self, aggregate: WineAggregate) -> AppResult<i32> {
        let WineAggregate {
            wine,
            grapes,
            purchases,
            awards,
        } = aggregate;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let wine_id = Wine::insert(wine)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .last_insert_id;

        insert_grape_links(&txn, wine_id, grapes).await?;

        for NewPurchase {
            place,
            mut purchase,
        } in purchases
        {
            let place_id = Place::insert(place)
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .last_insert_id;

            purchase.wine_id = Set(wine_id);
            purchase.place_id = Set(place_id);
            WinePurchase::insert(purchase)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        for mut award in awards {
            award.wine_id = Set(wine_id);
            WineAward::insert(award)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(wine_id)
    }

    /// Apply column assignments and optionally replace the grape set.
    ///
    /// `updated_at` is always bumped. Returns `false` when the wine does not exist,
    /// in which case nothing is written.
    pub async fn update_partial(
        &self,
        id: i32,
        assignments: Vec<(wine::Column, Value)>,
        grapes: Option<Vec<wine_grape::ActiveModel>>,
    ) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut update = Wine::update_many().col_expr(
            wine::Column::UpdatedAt,
            SimpleExpr::from(Expr::current_timestamp()),
        );
        for (column, value) in assignments {
            update = update.col_expr(column, Expr::value(value));
        }

        let result = update
            .filter(wine::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        if let Some(grapes) = grapes {
            WineGrape::delete_many()
                .filter(wine_grape::Column::WineId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            insert_grape_links(&txn, id, grapes).await?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }

    /// Delete a wine and the places of its purchases. Other owned rows go with it
    /// via cascade. Returns whether it existed.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Removing a place cascades to the purchase pointing at it.
        let places = Place::delete_many()
            .filter(
                place::Column::Id.in_subquery(
                    Query::select()
                        .column(wine_purchase::Column::PlaceId)
                        .from(WinePurchase)
                        .and_where(wine_purchase::Column::WineId.eq(id))
                        .to_owned(),
                ),
            )
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = Wine::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        debug!(wine_id = id, places = places.rows_affected, "Deleted wine rows");
        Ok(true)
    }

    // ==================== Detail Reads ====================

    /// Find a wine with its denomination, if any.
    pub async fn find_with_origin(
        &self,
        id: i32,
    ) -> AppResult<Option<(wine::Model, Option<denomination::Model>)>> {
        Wine::find_by_id(id)
            .find_also_related(Denomination)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Grape links of a wine, by grape name.
    pub async fn find_grapes(
        &self,
        wine_id: i32,
    ) -> AppResult<Vec<(wine_grape::Model, Option<grape::Model>)>> {
        WineGrape::find()
            .filter(wine_grape::Column::WineId.eq(wine_id))
            .find_also_related(Grape)
            .order_by_asc(grape::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Purchases of a wine with their places, newest first.
    pub async fn find_purchases(
        &self,
        wine_id: i32,
    ) -> AppResult<Vec<(wine_purchase::Model, Option<place::Model>)>> {
        WinePurchase::find()
            .filter(wine_purchase::Column::WineId.eq(wine_id))
            .find_also_related(Place)
            .order_by_desc(wine_purchase::Column::PurchasedAt)
            .order_by_desc(wine_purchase::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Awards of a wine, most recent year first, undated last.
    pub async fn find_awards(&self, wine_id: i32) -> AppResult<Vec<wine_award::Model>> {
        WineAward::find()
            .filter(wine_award::Column::WineId.eq(wine_id))
            .order_by_with_nulls(wine_award::Column::Year, Order::Desc, NullOrdering::Last)
            .order_by_asc(wine_award::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

async fn insert_grape_links<C: ConnectionTrait>(
    conn: &C,
    wine_id: i32,
    grapes: Vec<wine_grape::ActiveModel>,
) -> AppResult<()> {
    debug!(wine_id, count = grapes.len(), "Inserting grape links");

    for mut link in grapes {
        link.wine_id = Set(wine_id);
        WineGrape::insert(link)
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    Ok(())
}
