//! Common utilities and shared types for cellar.
//!
//! This crate provides foundational components used across all cellar crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Telemetry**: `tracing` subscriber setup via [`telemetry::init`]
//! - **Storage**: Wine photo file storage via [`PhotoStorage`]
//!
//! # Example
//!
//! ```no_run
//! use cellar_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     cellar_common::telemetry::init(&config.logging);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use storage::{
    LocalPhotoStorage, PhotoStorage, PhotoStorageService, StoredPhoto, content_hash,
};
