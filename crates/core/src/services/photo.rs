//! Wine photo service.

use cellar_common::{AppError, AppResult, PhotoStorageService, content_hash};
use cellar_db::entities::{PhotoType, wine_photo};
use cellar_db::repositories::{PhotoRepository, WineRepository};
use tracing::{info, warn};

/// Maximum accepted photo size in bytes.
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Service for attaching photos to wines.
#[derive(Clone)]
pub struct PhotoService {
    photo_repo: PhotoRepository,
    wine_repo: WineRepository,
    storage: PhotoStorageService,
}

impl PhotoService {
    /// Create a new photo service.
    #[must_use]
    pub const fn new(
        photo_repo: PhotoRepository,
        wine_repo: WineRepository,
        storage: PhotoStorageService,
    ) -> Self {
        Self {
            photo_repo,
            wine_repo,
            storage,
        }
    }

    /// Photos of a wine, by id.
    pub async fn list(&self, wine_id: i32) -> AppResult<Vec<wine_photo::Model>> {
        self.photo_repo.find_by_wine(wine_id).await
    }

    /// Store a photo for a wine. A typed photo replaces the wine's previous photo
    /// of the same type.
    pub async fn attach(
        &self,
        wine_id: i32,
        photo_type: Option<PhotoType>,
        extension: &str,
        data: &[u8],
    ) -> AppResult<wine_photo::Model> {
        if data.is_empty() {
            return Err(AppError::validation("file", "must not be empty"));
        }
        if data.len() > MAX_PHOTO_SIZE {
            return Err(AppError::validation(
                "file",
                format!("must be at most {MAX_PHOTO_SIZE} bytes"),
            ));
        }
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();

        if self.wine_repo.find_by_id(wine_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Wine {wine_id} not found")));
        }

        let hash = content_hash(data);
        let stored = self.storage.save(wine_id, &hash, &extension, data).await?;

        let (photo, replaced) = match self
            .photo_repo
            .insert_replacing(wine_id, photo_type, &stored)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                self.discard_unreferenced(&stored.url).await;
                return Err(e);
            }
        };

        if let Some(old) = replaced
            && old.url != photo.url
        {
            self.discard_unreferenced(&old.url).await;
        }

        info!(wine_id, photo_id = photo.id, hash = %photo.hash, "Attached photo");
        Ok(photo)
    }

    /// Remove a photo and its file.
    pub async fn remove(&self, photo_id: i32) -> AppResult<()> {
        let photo = self
            .photo_repo
            .find_by_id(photo_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {photo_id} not found")))?;

        self.photo_repo.delete(photo_id).await?;
        self.discard_unreferenced(&photo.url).await;

        info!(photo_id, wine_id = photo.wine_id, "Removed photo");
        Ok(())
    }

    /// Delete a stored file unless a photo row still points at it.
    async fn discard_unreferenced(&self, url: &str) {
        match self.photo_repo.count_by_url(url).await {
            Ok(0) => {
                if let Err(e) = self.storage.delete_by_url(url).await {
                    warn!(url, error = %e, "Failed to delete photo file");
                }
            }
            Ok(_) => {}
            Err(e) => warn!(url, error = %e, "Failed to check photo file references"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cellar_common::{LocalPhotoStorage, PhotoStorage};
    use cellar_db::entities::{Country, WineType, wine};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn test_wine(id: i32) -> wine::Model {
        wine::Model {
            id,
            name: "Albariño".to_string(),
            winery: None,
            wine_type: Some(WineType::White),
            do_id: None,
            country: Some(Country::Spain),
            aging_type: None,
            vintage_year: None,
            alcohol_percentage: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn setup(db: MockDatabase) -> (PhotoService, Arc<LocalPhotoStorage>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(LocalPhotoStorage::new(
            dir.path().to_path_buf(),
            "/photos".to_string(),
        ));
        let db = Arc::new(db.into_connection());
        let service = PhotoService::new(
            PhotoRepository::new(Arc::clone(&db)),
            WineRepository::new(db),
            storage.clone(),
        );
        (service, storage, dir)
    }

    fn row_for(id: i32, wine_id: i32, data: &[u8], photo_type: Option<PhotoType>) -> wine_photo::Model {
        let hash = content_hash(data);
        wine_photo::Model {
            id,
            wine_id,
            url: format!("/photos/{wine_id}/{hash}.jpg"),
            photo_type,
            hash,
            size: data.len() as i64,
            extension: "jpg".to_string(),
        }
    }

    fn count_row(count: i64) -> std::collections::BTreeMap<&'static str, Value> {
        maplit::btreemap! { "num_items" => Value::BigInt(Some(count)) }
    }

    #[tokio::test]
    async fn test_attach_writes_file() {
        let data = b"label bytes";
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_wine(10)]])
            .append_query_results([[row_for(1, 10, data, None)]]);
        let (service, _storage, dir) = setup(db);

        let photo = service.attach(10, None, ".JPG", data).await.unwrap();

        assert_eq!(photo.hash.len(), 16);
        assert!(
            dir.path()
                .join("10")
                .join(format!("{}.jpg", content_hash(data)))
                .exists()
        );
    }

    #[tokio::test]
    async fn test_attach_replaces_file_of_same_type() {
        let old_data = b"old front label";
        let new_data = b"new front label";
        let old_row = row_for(1, 10, old_data, Some(PhotoType::FrontLabel));
        let new_row = row_for(2, 10, new_data, Some(PhotoType::FrontLabel));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_wine(10)]])
            .append_query_results([[old_row.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[new_row]])
            .append_query_results([[count_row(0)]]);
        let (service, storage, dir) = setup(db);

        storage
            .save(10, &old_row.hash, "jpg", old_data)
            .await
            .unwrap();

        service
            .attach(10, Some(PhotoType::FrontLabel), "jpg", new_data)
            .await
            .unwrap();

        let wine_dir = dir.path().join("10");
        assert!(!wine_dir.join(format!("{}.jpg", old_row.hash)).exists());
        assert!(wine_dir.join(format!("{}.jpg", content_hash(new_data))).exists());
    }

    #[tokio::test]
    async fn test_attach_rejects_empty_file() {
        let (service, _storage, _dir) = setup(MockDatabase::new(DatabaseBackend::Postgres));

        let err = service.attach(10, None, "jpg", b"").await.unwrap_err();

        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "file"));
    }

    #[tokio::test]
    async fn test_attach_to_missing_wine() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<wine::Model>::new()]);
        let (service, _storage, dir) = setup(db);

        let err = service.attach(404, None, "jpg", b"data").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!dir.path().join("404").exists());
    }

    #[tokio::test]
    async fn test_remove_deletes_file() {
        let data = b"bottle";
        let row = row_for(3, 10, data, Some(PhotoType::Bottle));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[count_row(0)]]);
        let (service, storage, dir) = setup(db);
        storage.save(10, &row.hash, "jpg", data).await.unwrap();

        service.remove(3).await.unwrap();

        assert!(!dir.path().join("10").join(format!("{}.jpg", row.hash)).exists());
    }

    #[tokio::test]
    async fn test_remove_missing_photo() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<wine_photo::Model>::new()]);
        let (service, _storage, _dir) = setup(db);

        let err = service.remove(3).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_replacing_keeps_file_shared_with_other_photo() {
        let shared = b"same bytes";
        let new_data = b"new front label";
        let old_front = row_for(1, 10, shared, Some(PhotoType::FrontLabel));
        let new_front = row_for(3, 10, new_data, Some(PhotoType::FrontLabel));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_wine(10)]])
            .append_query_results([[old_front.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[new_front]])
            // the bottle photo still uses the shared file
            .append_query_results([[count_row(1)]]);
        let (service, storage, dir) = setup(db);
        storage.save(10, &old_front.hash, "jpg", shared).await.unwrap();

        service
            .attach(10, Some(PhotoType::FrontLabel), "jpg", new_data)
            .await
            .unwrap();

        let wine_dir = dir.path().join("10");
        assert!(wine_dir.join(format!("{}.jpg", old_front.hash)).exists());
        assert!(wine_dir.join(format!("{}.jpg", content_hash(new_data))).exists());
    }

    #[tokio::test]
    async fn test_remove_keeps_file_shared_with_other_photo() {
        let data = b"bottle";
        let row = row_for(3, 10, data, Some(PhotoType::Bottle));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[count_row(1)]]);
        let (service, storage, dir) = setup(db);
        storage.save(10, &row.hash, "jpg", data).await.unwrap();

        service.remove(3).await.unwrap();

        assert!(dir.path().join("10").join(format!("{}.jpg", row.hash)).exists());
    }

    #[tokio::test]
    async fn test_failed_insert_removes_new_file() {
        let data = b"orphan candidate";
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_wine(10)]])
            .append_query_errors([DbErr::Custom("duplicate key value".to_string())])
            .append_query_results([[count_row(0)]]);
        let (service, _storage, dir) = setup(db);

        let err = service.attach(10, None, "jpg", data).await.unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert!(
            !dir.path()
                .join("10")
                .join(format!("{}.jpg", content_hash(data)))
                .exists()
        );
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_file_already_in_use() {
        let data = b"already attached";
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_wine(10)]])
            .append_query_errors([DbErr::Custom("duplicate key value".to_string())])
            .append_query_results([[count_row(1)]]);
        let (service, _storage, dir) = setup(db);

        assert!(service.attach(10, None, "jpg", data).await.is_err());
        assert!(
            dir.path()
                .join("10")
                .join(format!("{}.jpg", content_hash(data)))
                .exists()
        );
    }
}
