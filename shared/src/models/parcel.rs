//! Land parcel models

use serde::{Deserialize, Serialize};

use crate::types::ParcelId;

/// A parcel of land owned by one farmer (`land_parcels` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LandParcel {
    pub parcel_id: ParcelId,
    pub farmer_id: Option<String>,
    /// Area in hectares
    pub area_hectares: Option<f64>,
    pub soil_type: Option<String>,
    pub irrigation_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
