//! Wine photo file storage.
//!
//! Photos live under `{base_path}/{wine_id}/{hash}.{extension}` and are served
//! from `{base_url}/{wine_id}/{hash}.{extension}`.

use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::{AppError, AppResult};

/// Length of the content hash stored alongside each photo.
pub const HASH_LEN: usize = 16;

/// Metadata of a photo written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// Public URL to access the file.
    pub url: String,
    /// Content hash (first 16 hex chars of SHA-256).
    pub hash: String,
    /// File size in bytes.
    pub size: i64,
    /// Lowercase file extension without the dot.
    pub extension: String,
}

/// Compute the content hash used to name photo files.
#[must_use]
pub fn content_hash(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_LEN);
    hash
}

/// Photo storage backend trait.
#[async_trait::async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Write a photo for a wine.
    async fn save(
        &self,
        wine_id: i32,
        hash: &str,
        extension: &str,
        data: &[u8],
    ) -> AppResult<StoredPhoto>;

    /// Delete a photo by its public URL. Missing files are not an error.
    async fn delete_by_url(&self, url: &str) -> AppResult<()>;

    /// Remove a wine's photo directory and anything left in it.
    async fn delete_wine_dir(&self, wine_id: i32) -> AppResult<()>;
}

/// Shared photo storage handle.
pub type PhotoStorageService = std::sync::Arc<dyn PhotoStorage>;

/// Local filesystem photo storage.
#[derive(Debug, Clone)]
pub struct LocalPhotoStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalPhotoStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn key_from_url<'a>(&self, url: &'a str) -> AppResult<&'a str> {
        let key = url
            .strip_prefix(self.base_url.as_str())
            .map(|rest| rest.trim_start_matches('/'))
            .ok_or_else(|| AppError::Storage(format!("URL outside photo storage: {url}")))?;

        if key.is_empty() || key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(AppError::Storage(format!("Invalid photo URL: {url}")));
        }

        Ok(key)
    }
}

fn check_extension(extension: &str) -> AppResult<()> {
    let valid = !extension.is_empty()
        && extension.len() <= 8
        && extension
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(
            "extension",
            "must be 1-8 lowercase alphanumeric characters",
        ))
    }
}

fn check_hash(hash: &str) -> AppResult<()> {
    if hash.len() == HASH_LEN && hash.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(AppError::validation(
            "hash",
            format!("must be {HASH_LEN} hexadecimal characters"),
        ))
    }
}

#[async_trait::async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn save(
        &self,
        wine_id: i32,
        hash: &str,
        extension: &str,
        data: &[u8],
    ) -> AppResult<StoredPhoto> {
        check_hash(hash)?;
        check_extension(extension)?;

        let dir = self.base_path.join(wine_id.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;

        let file_name = format!("{hash}.{extension}");
        tokio::fs::write(dir.join(&file_name), data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {e}")))?;

        Ok(StoredPhoto {
            url: format!("{}/{wine_id}/{file_name}", self.base_url),
            hash: hash.to_string(),
            size: data.len() as i64,
            extension: extension.to_string(),
        })
    }

    async fn delete_by_url(&self, url: &str) -> AppResult<()> {
        let path = self.base_path.join(self.key_from_url(url)?);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete file: {e}")))?;
        }
        Ok(())
    }

    async fn delete_wine_dir(&self, wine_id: i32) -> AppResult<()> {
        let dir = self.base_path.join(wine_id.to_string());
        if dir.exists() {
            tokio::fs::remove_dir_all(&dir)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete directory: {e}")))?;
        }
        Ok(())
    }
}
