//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p cellar-db --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `cellar_test`)
//!   `TEST_DB_PASSWORD` (default: `cellar_test`)
//!   `TEST_DB_NAME` (default: `cellar_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use cellar_common::AppError;
use cellar_db::entities::{Country, WineType, review, user, wine};
use cellar_db::repositories::{
    ReviewRepository, SortDirection, WineListFilter, WineRepository, WineSortField,
};
use cellar_db::test_utils::{TestDatabase, TestDbConfig};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, NotSet, Set};

async fn insert_wine(db: &DatabaseConnection, name: &str) -> i32 {
    wine::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        winery: Set(None),
        wine_type: Set(Some(WineType::Red)),
        do_id: Set(None),
        country: Set(Some(Country::Spain)),
        aging_type: Set(None),
        vintage_year: Set(Some(2021)),
        alcohol_percentage: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn insert_user(db: &DatabaseConnection, username: &str) -> i32 {
    user::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        display_name: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

fn review_model(user_id: i32, wine_id: i32, score: i32) -> review::ActiveModel {
    review::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        wine_id: Set(wine_id),
        score: Set(Some(score)),
        intensity_aroma: Set(3),
        sweetness: Set(0),
        acidity: Set(3),
        tannin: Set(Some(3)),
        body: Set(3),
        persistence: Set(3),
        created_at: Set(Utc::now().into()),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.unwrap();
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_create_tables() {
    let db = TestDatabase::create_unique().await.unwrap();

    for table in [
        "do",
        "grape",
        "place",
        "wine",
        "wine_grape",
        "wine_purchase",
        "wine_award",
        "wine_photo",
        "user",
        "review",
        "review_bullets",
    ] {
        let result = db
            .connection()
            .execute(sea_orm::Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                format!("SELECT 1 FROM \"{table}\" LIMIT 1"),
            ))
            .await;
        assert!(result.is_ok(), "Table {table} missing: {:?}", result.err());
    }

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_unique_review_index_maps_to_already_exists() {
    let db = TestDatabase::create_unique().await.unwrap();
    let wine_id = insert_wine(db.connection(), "Ribera").await;
    let user_id = insert_user(db.connection(), "ana").await;

    let repo = ReviewRepository::new(Arc::new(db.connection().clone()));
    repo.create(review_model(user_id, wine_id, 88), vec!["spicy".to_string()])
        .await
        .unwrap();

    let err = repo
        .create(review_model(user_id, wine_id, 70), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_listing_averages_scores() {
    let db = TestDatabase::create_unique().await.unwrap();
    let conn = db.connection();
    let high = insert_wine(conn, "Alto").await;
    let low = insert_wine(conn, "Bajo").await;
    let unscored = insert_wine(conn, "Sin nota").await;
    let ana = insert_user(conn, "ana").await;
    let luis = insert_user(conn, "luis").await;

    let reviews = ReviewRepository::new(Arc::new(conn.clone()));
    reviews.create(review_model(ana, high, 90), Vec::new()).await.unwrap();
    reviews.create(review_model(luis, high, 95), Vec::new()).await.unwrap();
    reviews.create(review_model(ana, low, 60), Vec::new()).await.unwrap();

    let wines = WineRepository::new(Arc::new(conn.clone()));
    let filter = WineListFilter {
        sort_by: WineSortField::Score,
        sort_dir: SortDirection::Desc,
        ..WineListFilter::default()
    };
    let (rows, total) = wines.list(&filter).await.unwrap();

    assert_eq!(total, 3);
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![high, low, unscored]);
    assert_eq!(rows[0].avg_score, Some(92.5));
    assert_eq!(rows[0].review_count, 2);
    assert_eq!(rows[2].avg_score, None);

    let filter = WineListFilter {
        search: Some("100%_".to_string()),
        ..WineListFilter::default()
    };
    let (rows, total) = wines.list(&filter).await.unwrap();
    assert_eq!(total, 0);
    assert!(rows.is_empty());

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testuser"));
    assert!(url.contains("testdb"));
}

#[test]
fn test_postgres_url_format() {
    let config = TestDbConfig::default();
    let url = config.postgres_url();
    assert!(url.ends_with("/postgres"));
}
