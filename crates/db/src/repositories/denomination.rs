//! Denomination of origin repository.

use std::sync::Arc;

use cellar_common::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::entities::{Denomination, denomination};

/// Repository for denomination lookups.
#[derive(Clone)]
pub struct DenominationRepository {
    db: Arc<DatabaseConnection>,
}

impl DenominationRepository {
    /// Create a new denomination repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find denomination by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<denomination::Model>> {
        Denomination::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all denominations, by country then name.
    pub async fn find_all(&self) -> AppResult<Vec<denomination::Model>> {
        Denomination::find()
            .order_by_asc(denomination::Column::Country)
            .order_by_asc(denomination::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
