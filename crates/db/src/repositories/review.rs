//! Review repository.

use std::sync::Arc;

use cellar_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::entities::{Review, ReviewBullet, User, review, review_bullet, user};

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the review a user wrote for a wine.
    pub async fn find_by_user_and_wine(
        &self,
        user_id: i32,
        wine_id: i32,
    ) -> AppResult<Option<review::Model>> {
        Review::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::WineId.eq(wine_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a review and its bullets in one transaction. Returns the new id.
    ///
    /// A concurrent insert for the same (user, wine) pair surfaces as
    /// [`AppError::AlreadyExists`] through the unique index.
    pub async fn create(&self, model: review::ActiveModel, bullets: Vec<String>) -> AppResult<i32> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let review_id = Review::insert(model)
            .exec(&txn)
            .await
            .map_err(map_unique_violation)?
            .last_insert_id;

        insert_bullets(&txn, review_id, bullets).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(review_id)
    }

    /// Overwrite a review's scores and replace its bullet set.
    ///
    /// Returns `false` when the review does not exist.
    pub async fn update(
        &self,
        id: i32,
        model: review::ActiveModel,
        bullets: Vec<String>,
    ) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = Review::update_many()
            .set(model)
            .filter(review::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        ReviewBullet::delete_many()
            .filter(review_bullet::Column::ReviewId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        insert_bullets(&txn, id, bullets).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }

    /// Delete a review; its bullets cascade. Returns whether it existed.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = Review::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Reviews of a wine with their authors, newest first.
    pub async fn find_by_wine_with_user(
        &self,
        wine_id: i32,
    ) -> AppResult<Vec<(review::Model, Option<user::Model>)>> {
        Review::find()
            .filter(review::Column::WineId.eq(wine_id))
            .find_also_related(User)
            .order_by_desc(review::Column::CreatedAt)
            .order_by_desc(review::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bullets of several reviews in one query.
    pub async fn find_bullets(&self, review_ids: &[i32]) -> AppResult<Vec<review_bullet::Model>> {
        if review_ids.is_empty() {
            return Ok(vec![]);
        }

        ReviewBullet::find()
            .filter(review_bullet::Column::ReviewId.is_in(review_ids.iter().copied()))
            .order_by_asc(review_bullet::Column::ReviewId)
            .order_by_asc(review_bullet::Column::Bullet)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn map_unique_violation(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::AlreadyExists("Review for this user and wine already exists".to_string())
        }
        _ => AppError::Database(err.to_string()),
    }
}

async fn insert_bullets<C: ConnectionTrait>(
    conn: &C,
    review_id: i32,
    bullets: Vec<String>,
) -> AppResult<()> {
    for bullet in bullets {
        review_bullet::ActiveModel {
            review_id: Set(review_id),
            bullet: Set(bullet),
        }
        .insert(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, NotSet, Value};

    fn create_test_review(id: i32, user_id: i32, wine_id: i32) -> review::Model {
        review::Model {
            id,
            user_id,
            wine_id,
            score: Some(91),
            intensity_aroma: 4,
            sweetness: 1,
            acidity: 3,
            tannin: Some(3),
            body: 4,
            persistence: 4,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_user(id: i32, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            display_name: None,
            created_at: Utc::now().into(),
        }
    }

    fn bullet(review_id: i32, value: &str) -> review_bullet::Model {
        review_bullet::Model {
            review_id,
            bullet: value.to_string(),
        }
    }

    fn new_review() -> review::ActiveModel {
        review::ActiveModel {
            id: NotSet,
            user_id: Set(1),
            wine_id: Set(10),
            score: Set(Some(88)),
            intensity_aroma: Set(3),
            sweetness: Set(0),
            acidity: Set(3),
            tannin: Set(None),
            body: Set(2),
            persistence: Set(3),
            created_at: Set(Utc::now().into()),
        }
    }

    #[tokio::test]
    async fn test_find_by_user_and_wine() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_review(5, 1, 10)]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let review = repo.find_by_user_and_wine(1, 10).await.unwrap().unwrap();

        assert_eq!(review.id, 5);
        assert_eq!(review.score, Some(91));
    }

    #[tokio::test]
    async fn test_create_with_bullets() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! { "id" => Value::Int(Some(7)) }]])
                .append_query_results([[bullet(7, "fruity")], [bullet(7, "elegant")]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let id = repo
            .create(
                new_review(),
                vec!["fruity".to_string(), "elegant".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(id, 7);
    }

    #[tokio::test]
    async fn test_update_missing_review() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let existed = repo.update(99, new_review(), vec![]).await.unwrap();

        assert!(!existed);
    }

    #[tokio::test]
    async fn test_find_by_wine_with_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    (create_test_review(2, 1, 10), create_test_user(1, "ana")),
                    (create_test_review(1, 2, 10), create_test_user(2, "luis")),
                ]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let reviews = repo.find_by_wine_with_user(10).await.unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].1.as_ref().unwrap().username, "ana");
    }

    #[tokio::test]
    async fn test_find_bullets_empty_input_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ReviewRepository::new(db);
        let bullets = repo.find_bullets(&[]).await.unwrap();

        assert!(bullets.is_empty());
    }

    #[tokio::test]
    async fn test_find_bullets() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[bullet(1, "floral"), bullet(2, "oaky")]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let bullets = repo.find_bullets(&[1, 2]).await.unwrap();

        assert_eq!(bullets.len(), 2);
        assert_eq!(bullets[1].bullet, "oaky");
    }
}
