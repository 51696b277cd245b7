//! Data access for the agricultural record store
//!
//! Handlers and services talk to the database only through [`RecordStore`]
//! (a session factory) and [`RecordSession`] (the queries one request runs).
//! A session holds one pooled connection for its whole lifetime and gives it
//! back when dropped, whichever way the request ends.

mod postgres;

use std::fmt;

use thiserror::Error;

use crate::models::{Farmer, LandParcel, ParcelId, Record};

pub use postgres::{PgRecordStore, PgSession};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised at the data-access seam
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or refused to serve (network, DNS,
    /// pool exhaustion, server shutting down)
    #[error("store unavailable: {0}")]
    Unavailable(#[source] BoxError),

    /// The store answered, but the query itself failed
    #[error("query failed: {0}")]
    Query(#[source] BoxError),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_operational(&err) {
            StoreError::Unavailable(Box::new(err))
        } else {
            StoreError::Query(Box::new(err))
        }
    }
}

/// Whether `err` is a connectivity/operational fault rather than a fault of
/// the query.
pub fn is_operational(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Configuration(_)
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db.code().is_some_and(|code| is_operational_sqlstate(&code)),
        _ => false,
    }
}

/// SQLSTATE classes 08 (connection exception) and 53 (insufficient
/// resources), plus the 57P0x operator-intervention codes.
fn is_operational_sqlstate(code: &str) -> bool {
    code.starts_with("08") || code.starts_with("53") || matches!(code, "57P01" | "57P02" | "57P03")
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Parcel-keyed tables whose rows are returned with their native columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildTable {
    CropSeasons,
    CropHistory,
    DigitalCropSurvey,
}

impl ChildTable {
    pub const ALL: [ChildTable; 3] = [
        ChildTable::CropSeasons,
        ChildTable::CropHistory,
        ChildTable::DigitalCropSurvey,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            ChildTable::CropSeasons => "crop_seasons",
            ChildTable::CropHistory => "crop_history",
            ChildTable::DigitalCropSurvey => "digital_crop_survey",
        }
    }

    /// Column that orders rows newest first; `created_at` breaks ties
    pub fn temporal_key(self) -> &'static str {
        match self {
            ChildTable::CropSeasons | ChildTable::CropHistory => "season_year",
            ChildTable::DigitalCropSurvey => "survey_date",
        }
    }
}

impl fmt::Display for ChildTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Factory for request-scoped sessions
#[axum::async_trait]
pub trait RecordStore: Send + Sync {
    /// Borrow a connection for the duration of one request
    async fn session(&self) -> StoreResult<Box<dyn RecordSession>>;

    /// Round-trip a trivial query to check reachability
    async fn ping(&self) -> StoreResult<()>;
}

/// The reads one aggregation runs, all on the same connection
#[axum::async_trait]
pub trait RecordSession: Send {
    /// Point lookup on `farmers.farmer_id`
    async fn find_farmer(&mut self, farmer_id: &str) -> StoreResult<Option<Farmer>>;

    /// All parcels whose `farmer_id` matches, in store order
    async fn land_parcels(&mut self, farmer_id: &str) -> StoreResult<Vec<LandParcel>>;

    /// Rows of `table` whose `parcel_id` is in `parcel_ids`, newest first.
    ///
    /// Callers must not pass an empty slice.
    async fn parcel_records(
        &mut self,
        table: ChildTable,
        parcel_ids: &[ParcelId],
    ) -> StoreResult<Vec<Record>>;

    /// Scheme enrollments joined with the scheme catalog, by scheme name
    async fn scheme_enrollments(&mut self, farmer_id: &str) -> StoreResult<Vec<Record>>;
}
