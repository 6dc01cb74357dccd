//! Core business logic for cellar.
//!
//! [`domain`] holds the validated value objects; [`services`] wires them to the
//! repositories in `cellar-db`.

pub mod domain;
pub mod services;

pub use services::*;
