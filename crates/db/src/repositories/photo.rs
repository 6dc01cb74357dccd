//! Wine photo repository.

use std::sync::Arc;

use cellar_common::{AppError, AppResult, StoredPhoto};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{PhotoType, WinePhoto, wine_photo};

/// Wine photo repository for database operations.
#[derive(Clone)]
pub struct PhotoRepository {
    db: Arc<DatabaseConnection>,
}

impl PhotoRepository {
    /// Create a new photo repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a photo by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<wine_photo::Model>> {
        WinePhoto::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Photos of a wine, by id.
    pub async fn find_by_wine(&self, wine_id: i32) -> AppResult<Vec<wine_photo::Model>> {
        WinePhoto::find()
            .filter(wine_photo::Column::WineId.eq(wine_id))
            .order_by_asc(wine_photo::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// URLs of every stored file of a wine.
    pub async fn find_urls_by_wine(&self, wine_id: i32) -> AppResult<Vec<String>> {
        let photos = self.find_by_wine(wine_id).await?;
        Ok(photos.into_iter().map(|p| p.url).collect())
    }

    /// Number of photo rows pointing at a stored file.
    pub async fn count_by_url(&self, url: &str) -> AppResult<u64> {
        WinePhoto::find()
            .filter(wine_photo::Column::Url.eq(url))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert photo metadata. A photo of the same non-null type on the same wine
    /// is removed in the same transaction and returned so its file can be deleted.
    pub async fn insert_replacing(
        &self,
        wine_id: i32,
        photo_type: Option<PhotoType>,
        file: &StoredPhoto,
    ) -> AppResult<(wine_photo::Model, Option<wine_photo::Model>)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let replaced = match photo_type {
            Some(photo_type) => {
                WinePhoto::find()
                    .filter(wine_photo::Column::WineId.eq(wine_id))
                    .filter(wine_photo::Column::PhotoType.eq(photo_type))
                    .one(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
            }
            None => None,
        };

        if let Some(old) = &replaced {
            old.clone()
                .delete(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        let inserted = wine_photo::ActiveModel {
            id: NotSet,
            wine_id: Set(wine_id),
            url: Set(file.url.clone()),
            photo_type: Set(photo_type),
            hash: Set(file.hash.clone()),
            size: Set(file.size),
            extension: Set(file.extension.clone()),
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((inserted, replaced))
    }

    /// Delete photo metadata. Returns whether it existed.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = WinePhoto::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}
