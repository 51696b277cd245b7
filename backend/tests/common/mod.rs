//! In-memory record store used by the integration tests
//!
//! Mirrors the PostgreSQL store closely enough to drive the service and the
//! router: parcel-keyed rows are filtered by parcel set and sorted newest
//! first, enrollments are sorted by scheme name. Every call is recorded, and
//! any call can be scripted to fail or to be forbidden outright.

#![allow(dead_code)]

use std::{
    cmp::Ordering,
    collections::HashMap,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Arc, Mutex,
    },
    time::Duration,
};

use agristack_backend::store::{ChildTable, RecordSession, RecordStore, StoreError, StoreResult};
use agristack_backend::{create_app, AppState, Config};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use shared::{Farmer, LandParcel, ParcelId, Record};

/// One call made against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Session,
    FindFarmer,
    LandParcels,
    ParcelRecords(ChildTable),
    SchemeEnrollments,
}

/// Rows held by the fake store
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub farmers: Vec<Farmer>,
    pub parcels: Vec<LandParcel>,
    pub child_rows: HashMap<ChildTable, Vec<Record>>,
    /// (farmer_id, projected enrollment row)
    pub enrollments: Vec<(String, Record)>,
}

impl Fixture {
    pub fn farmer(mut self, farmer_id: &str) -> Self {
        self.farmers.push(farmer(farmer_id));
        self
    }

    pub fn parcel(mut self, farmer_id: &str, parcel_id: ParcelId) -> Self {
        self.parcels.push(parcel(farmer_id, parcel_id));
        self
    }

    pub fn row(mut self, table: ChildTable, record: Record) -> Self {
        self.child_rows.entry(table).or_default().push(record);
        self
    }

    pub fn enrollment(mut self, farmer_id: &str, record: Record) -> Self {
        self.enrollments.push((farmer_id.to_string(), record));
        self
    }
}

/// Scripted in-memory [`RecordStore`]
#[derive(Clone)]
pub struct ScriptedStore {
    fixture: Arc<Fixture>,
    failing: Option<Call>,
    stalling: Option<Call>,
    forbidden: Vec<Call>,
    leaky: bool,
    calls: Arc<Mutex<Vec<Call>>>,
    open_sessions: Arc<AtomicUsize>,
}

impl ScriptedStore {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture: Arc::new(fixture),
            failing: None,
            stalling: None,
            forbidden: Vec::new(),
            leaky: false,
            calls: Arc::new(Mutex::new(Vec::new())),
            open_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail `call` with a connection-refused transport error
    pub fn failing_on(mut self, call: Call) -> Self {
        self.failing = Some(call);
        self
    }

    /// Never answer `call`, like a half-open connection
    pub fn stalling_on(mut self, call: Call) -> Self {
        self.stalling = Some(call);
        self
    }

    /// Panic if `call` is ever made
    pub fn forbidding(mut self, call: Call) -> Self {
        self.forbidden.push(call);
        self
    }

    /// Ignore the parcel filter and return every row of a table
    pub fn leaky(mut self) -> Self {
        self.leaky = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(AtomicOrdering::SeqCst)
    }

    async fn record(&self, call: Call) -> StoreResult<()> {
        self.calls.lock().unwrap().push(call);
        assert!(
            !self.forbidden.contains(&call),
            "forbidden store call: {:?}",
            call
        );
        if self.stalling == Some(call) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing == Some(call) {
            return Err(StoreError::from(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))));
        }
        Ok(())
    }
}

#[axum::async_trait]
impl RecordStore for ScriptedStore {
    async fn session(&self) -> StoreResult<Box<dyn RecordSession>> {
        self.record(Call::Session).await?;
        self.open_sessions.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(Box::new(ScriptedSession {
            store: self.clone(),
        }))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

struct ScriptedSession {
    store: ScriptedStore,
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.store.open_sessions.fetch_sub(1, AtomicOrdering::SeqCst);
    }
}

#[axum::async_trait]
impl RecordSession for ScriptedSession {
    async fn find_farmer(&mut self, farmer_id: &str) -> StoreResult<Option<Farmer>> {
        self.store.record(Call::FindFarmer).await?;
        Ok(self
            .store
            .fixture
            .farmers
            .iter()
            .find(|f| f.farmer_id == farmer_id)
            .cloned())
    }

    async fn land_parcels(&mut self, farmer_id: &str) -> StoreResult<Vec<LandParcel>> {
        self.store.record(Call::LandParcels).await?;
        Ok(self
            .store
            .fixture
            .parcels
            .iter()
            .filter(|p| p.farmer_id.as_deref() == Some(farmer_id))
            .cloned()
            .collect())
    }

    async fn parcel_records(
        &mut self,
        table: ChildTable,
        parcel_ids: &[ParcelId],
    ) -> StoreResult<Vec<Record>> {
        self.store.record(Call::ParcelRecords(table)).await?;
        assert!(!parcel_ids.is_empty(), "empty parcel set sent to {}", table);

        let leaky = self.store.leaky;
        let mut rows: Vec<Record> = self
            .store
            .fixture
            .child_rows
            .get(&table)
            .into_iter()
            .flatten()
            .filter(|r| leaky || r.parcel_id().is_some_and(|id| parcel_ids.contains(&id)))
            .cloned()
            .collect();

        let key = table.temporal_key();
        rows.sort_by(|a, b| {
            compare_column(b, a, key).then_with(|| compare_column(b, a, "created_at"))
        });
        Ok(rows)
    }

    async fn scheme_enrollments(&mut self, farmer_id: &str) -> StoreResult<Vec<Record>> {
        self.store.record(Call::SchemeEnrollments).await?;
        let mut rows: Vec<Record> = self
            .store
            .fixture
            .enrollments
            .iter()
            .filter(|(owner, _)| owner == farmer_id)
            .map(|(_, record)| record.clone())
            .collect();
        rows.sort_by(|a, b| compare_column(a, b, "scheme_name"));
        Ok(rows)
    }
}

/// Compare a column holding integers or ISO-8601 strings
fn compare_column(a: &Record, b: &Record, column: &str) -> Ordering {
    match (a.get(column), b.get(column)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn farmer(farmer_id: &str) -> Farmer {
    Farmer {
        farmer_id: farmer_id.to_string(),
        full_name: Some("Ramesh Patil".to_string()),
        gender: Some("M".to_string()),
        mobile_number: Some("9876543210".to_string()),
        village: Some("Shirur".to_string()),
        district: Some("Pune".to_string()),
        state: Some("Maharashtra".to_string()),
        created_at: NaiveDate::from_ymd_opt(2024, 1, 15).and_then(|d| d.and_hms_opt(9, 30, 0)),
    }
}

pub fn parcel(farmer_id: &str, parcel_id: ParcelId) -> LandParcel {
    LandParcel {
        parcel_id,
        farmer_id: Some(farmer_id.to_string()),
        area_hectares: Some(1.5),
        soil_type: Some("Black cotton".to_string()),
        irrigation_type: Some("Drip".to_string()),
        latitude: Some(18.8242),
        longitude: Some(74.3733),
    }
}

pub fn season(parcel_id: ParcelId, season_year: i32, created_at: &str) -> Record {
    Record::new()
        .with("parcel_id", parcel_id)
        .with("season_year", season_year)
        .with("crop_name", "Soybean")
        .with("created_at", created_at)
}

pub fn survey(parcel_id: ParcelId, survey_date: &str, created_at: &str) -> Record {
    Record::new()
        .with("parcel_id", parcel_id)
        .with("survey_date", survey_date)
        .with("crop_observed", "Cotton")
        .with("created_at", created_at)
}

pub fn enrollment(scheme_id: i32, scheme_name: &str) -> Record {
    Record::new()
        .with("scheme_id", scheme_id)
        .with("scheme_name", scheme_name)
        .with("enrollment_status", "ACTIVE")
        .with("enrollment_date", "2024-04-01")
}

/// Router over `store` with default configuration
pub fn app(store: &ScriptedStore) -> Router {
    app_with(store, config())
}

pub fn app_with(store: &ScriptedStore, config: Config) -> Router {
    create_app(AppState::new(Arc::new(store.clone()), config))
}

pub fn config() -> Config {
    Config::with_database_url("postgres://agri@localhost/agristack")
        .expect("default configuration")
}
