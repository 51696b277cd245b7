//! Shared types and models for the AgriStack Mock API
//!
//! This crate contains the record shapes returned by the farmer aggregation
//! endpoint. Enable the `sqlx` feature to derive row decoding for the typed
//! entities.

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
