//! Catalog lookups: denominations and grape varieties.

use cellar_common::{AppError, AppResult};
use cellar_db::entities::{denomination, grape};
use cellar_db::repositories::{DenominationRepository, GrapeRepository};

/// Read-only access to the reference tables.
#[derive(Clone)]
pub struct CatalogService {
    denomination_repo: DenominationRepository,
    grape_repo: GrapeRepository,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(denomination_repo: DenominationRepository, grape_repo: GrapeRepository) -> Self {
        Self {
            denomination_repo,
            grape_repo,
        }
    }

    /// All denominations, by country then name.
    pub async fn list_denominations(&self) -> AppResult<Vec<denomination::Model>> {
        self.denomination_repo.find_all().await
    }

    /// A single denomination.
    pub async fn get_denomination(&self, id: i32) -> AppResult<denomination::Model> {
        self.denomination_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Denomination {id} not found")))
    }

    /// All grapes, by name.
    pub async fn list_grapes(&self) -> AppResult<Vec<grape::Model>> {
        self.grape_repo.find_all().await
    }
}
