//! Grape repository.

use std::sync::Arc;

use cellar_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{Grape, grape};

/// Repository for grape lookups.
#[derive(Clone)]
pub struct GrapeRepository {
    db: Arc<DatabaseConnection>,
}

impl GrapeRepository {
    /// Create a new grape repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List all grapes by name.
    pub async fn find_all(&self) -> AppResult<Vec<grape::Model>> {
        Grape::find()
            .order_by_asc(grape::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Return which of the given ids exist.
    pub async fn find_existing_ids(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let grapes = Grape::find()
            .filter(grape::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(grapes.into_iter().map(|g| g.id).collect())
    }
}
