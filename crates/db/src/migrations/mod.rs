//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_reference_tables;
mod m20260101_000002_create_wine_tables;
mod m20260101_000003_create_review_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_reference_tables::Migration),
            Box::new(m20260101_000002_create_wine_tables::Migration),
            Box::new(m20260101_000003_create_review_tables::Migration),
        ]
    }
}
