//! Common types used across the platform

/// Identifier of a land parcel (`land_parcels.parcel_id`)
pub type ParcelId = i32;

/// Collect the parcel identifiers of a set of parcels, keeping their order.
pub fn parcel_ids<'a, I>(parcels: I) -> Vec<ParcelId>
where
    I: IntoIterator<Item = &'a crate::models::LandParcel>,
{
    parcels.into_iter().map(|p| p.parcel_id).collect()
}
