//! Farmer aggregation service
//!
//! Builds the composite farmer profile: farmer, land parcels, the three
//! parcel-keyed record sets and scheme enrollments, read on one session.

use std::{sync::Arc, time::Duration};

use crate::error::{AppError, AppResult};
use crate::models::{parcel_ids, AggregatedProfile, ParcelId, Record};
use crate::store::{ChildTable, RecordSession, RecordStore, StoreError, StoreResult};

const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Read-only aggregation over the record store
#[derive(Clone)]
pub struct FarmerAggregationService {
    store: Arc<dyn RecordStore>,
    deadline: Duration,
}

impl FarmerAggregationService {
    /// Create a new FarmerAggregationService instance
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Bound the whole aggregation, session acquisition included
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Get the aggregated profile of one farmer.
    ///
    /// Queries run one after another on a single session, which is released
    /// when this returns, on success, error or deadline. A store that stops
    /// answering past the deadline counts as unavailable.
    #[tracing::instrument(skip(self))]
    pub async fn get_farmer_profile(&self, farmer_id: &str) -> AppResult<AggregatedProfile> {
        match tokio::time::timeout(self.deadline, self.load_profile(farmer_id)).await {
            Ok(result) => result,
            Err(elapsed) => Err(StoreError::Unavailable(Box::new(elapsed)).into()),
        }
    }

    async fn load_profile(&self, farmer_id: &str) -> AppResult<AggregatedProfile> {
        let mut session = self.store.session().await?;
        Self::aggregate(&mut *session, farmer_id).await
    }

    async fn aggregate<S: RecordSession + ?Sized>(
        session: &mut S,
        farmer_id: &str,
    ) -> AppResult<AggregatedProfile> {
        // Get farmer; nothing else runs for an unknown id
        let farmer = session
            .find_farmer(farmer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Farmer".to_string()))?;

        // Get land parcels
        let land_parcels = session.land_parcels(farmer_id).await?;
        let parcel_ids = parcel_ids(&land_parcels);
        tracing::debug!(parcels = parcel_ids.len(), "loaded land parcels");

        // Get parcel-keyed records, skipped entirely without parcels
        let (current_seasons, crop_history, digital_crop_survey) = if parcel_ids.is_empty() {
            (Vec::new(), Vec::new(), Vec::new())
        } else {
            (
                Self::parcel_records(session, ChildTable::CropSeasons, &parcel_ids).await?,
                Self::parcel_records(session, ChildTable::CropHistory, &parcel_ids).await?,
                Self::parcel_records(session, ChildTable::DigitalCropSurvey, &parcel_ids).await?,
            )
        };

        // Get scheme enrollments
        let schemes = session.scheme_enrollments(farmer_id).await?;

        Ok(AggregatedProfile {
            farmer,
            land_parcels,
            current_seasons,
            crop_history,
            schemes,
            digital_crop_survey,
        })
    }

    async fn parcel_records<S: RecordSession + ?Sized>(
        session: &mut S,
        table: ChildTable,
        parcel_ids: &[ParcelId],
    ) -> StoreResult<Vec<Record>> {
        let records = session.parcel_records(table, parcel_ids).await?;
        let fetched = records.len();
        let records = retain_owned(records, parcel_ids);

        if records.len() != fetched {
            tracing::warn!(
                %table,
                dropped = fetched - records.len(),
                "store returned rows for parcels outside the farmer's holdings"
            );
        }
        tracing::debug!(%table, rows = records.len(), "loaded parcel records");

        Ok(records)
    }
}

/// Keep only rows whose `parcel_id` is one of `parcel_ids`, preserving order.
fn retain_owned(mut records: Vec<Record>, parcel_ids: &[ParcelId]) -> Vec<Record> {
    records.retain(|record| {
        record
            .parcel_id()
            .is_some_and(|id| parcel_ids.contains(&id))
    });
    records
}
