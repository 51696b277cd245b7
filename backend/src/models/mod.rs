//! Models for the AgriStack Mock API
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
pub use shared::types::*;
