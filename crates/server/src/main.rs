//! Cellar entry point.
//!
//! Loads configuration, connects to the database, applies pending migrations
//! and reports the state of the reference catalog.

use std::sync::Arc;

use cellar_common::{Config, telemetry};
use cellar_core::CatalogService;
use cellar_db::repositories::{DenominationRepository, GrapeRepository};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    telemetry::init(&config.logging);

    info!("Starting cellar...");

    let db = cellar_db::init(&config.database).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    cellar_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);
    let catalog_service = CatalogService::new(
        DenominationRepository::new(Arc::clone(&db)),
        GrapeRepository::new(Arc::clone(&db)),
    );

    let denominations = catalog_service.list_denominations().await?;
    let grapes = catalog_service.list_grapes().await?;
    if denominations.is_empty() || grapes.is_empty() {
        warn!("Reference catalog is empty; wines cannot reference a denomination or grape yet");
    }

    tokio::fs::create_dir_all(&config.storage.photo_dir).await?;

    info!(
        denominations = denominations.len(),
        grapes = grapes.len(),
        photo_dir = %config.storage.photo_dir.display(),
        "Catalog ready"
    );

    Ok(())
}
