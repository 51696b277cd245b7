//! Aggregated farmer profile returned by `/agristack/farmer/{farmer_id}`

use serde::{Deserialize, Serialize};

use super::{Farmer, LandParcel, Record};

/// Everything known about one farmer, merged into one document.
///
/// `current_seasons` holds the rows of `crop_seasons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedProfile {
    pub farmer: Farmer,
    pub land_parcels: Vec<LandParcel>,
    pub current_seasons: Vec<Record>,
    pub crop_history: Vec<Record>,
    pub schemes: Vec<Record>,
    pub digital_crop_survey: Vec<Record>,
}
