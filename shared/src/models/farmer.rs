//! Farmer registry models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A registered farmer (`farmers` table)
///
/// Serializes to exactly the declared column set, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Farmer {
    pub farmer_id: String,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub mobile_number: Option<String>,
    pub village: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}
