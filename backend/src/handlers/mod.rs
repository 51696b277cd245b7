//! HTTP handlers for the AgriStack Mock API

pub mod farmer;
pub mod health;

pub use farmer::get_farmer;
pub use health::{health_check, root};
