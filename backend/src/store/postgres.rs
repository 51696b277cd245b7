//! PostgreSQL implementation of the record store

use serde_json::Value;
use sqlx::{pool::PoolConnection, PgPool, Postgres};

use crate::models::{Farmer, LandParcel, ParcelId, Record};

use super::{ChildTable, RecordSession, RecordStore, StoreError, StoreResult};

const FIND_FARMER_SQL: &str = r#"
    SELECT farmer_id, full_name, gender, mobile_number, village, district, state, created_at
    FROM farmers
    WHERE farmer_id = $1
    LIMIT 1
"#;

const LAND_PARCELS_SQL: &str = r#"
    SELECT parcel_id, farmer_id, area_hectares, soil_type, irrigation_type, latitude, longitude
    FROM land_parcels
    WHERE farmer_id = $1
"#;

const SCHEME_ENROLLMENTS_SQL: &str = r#"
    SELECT json_build_object(
        'scheme_id', s.scheme_id,
        'scheme_name', s.scheme_name,
        'enrollment_status', fs.enrollment_status,
        'enrollment_date', fs.enrollment_date
    )
    FROM farmer_schemes fs
    JOIN schemes s ON s.scheme_id = fs.scheme_id
    WHERE fs.farmer_id = $1
    ORDER BY s.scheme_name ASC
"#;

/// Select every column of `table` as one JSON object per row, keeping the
/// table's column order.
pub(crate) fn parcel_records_sql(table: ChildTable) -> String {
    format!(
        r#"
    SELECT row_to_json(t)
    FROM {table} t
    WHERE t.parcel_id = ANY($1)
    ORDER BY t.{key} DESC, t.created_at DESC
"#,
        table = table.table_name(),
        key = table.temporal_key(),
    )
}

/// Record store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgRecordStore {
    db: PgPool,
}

impl PgRecordStore {
    /// Create a new PgRecordStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[axum::async_trait]
impl RecordStore for PgRecordStore {
    async fn session(&self) -> StoreResult<Box<dyn RecordSession>> {
        let conn = self.db.acquire().await?;
        Ok(Box::new(PgSession { conn }))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

/// One pooled connection, returned to the pool on drop
pub struct PgSession {
    conn: PoolConnection<Postgres>,
}

/// Turn `row_to_json` / `json_build_object` results into records
fn into_records(rows: Vec<Value>) -> StoreResult<Vec<Record>> {
    rows.into_iter()
        .map(|row| {
            Record::try_from(row).map_err(|other| {
                StoreError::Query(format!("expected a JSON object row, got {}", other).into())
            })
        })
        .collect()
}

#[axum::async_trait]
impl RecordSession for PgSession {
    async fn find_farmer(&mut self, farmer_id: &str) -> StoreResult<Option<Farmer>> {
        let farmer = sqlx::query_as::<_, Farmer>(FIND_FARMER_SQL)
            .bind(farmer_id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(farmer)
    }

    async fn land_parcels(&mut self, farmer_id: &str) -> StoreResult<Vec<LandParcel>> {
        let parcels = sqlx::query_as::<_, LandParcel>(LAND_PARCELS_SQL)
            .bind(farmer_id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(parcels)
    }

    async fn parcel_records(
        &mut self,
        table: ChildTable,
        parcel_ids: &[ParcelId],
    ) -> StoreResult<Vec<Record>> {
        let sql = parcel_records_sql(table);
        let rows = sqlx::query_scalar::<_, Value>(&sql)
            .bind(parcel_ids)
            .fetch_all(&mut *self.conn)
            .await?;

        into_records(rows)
    }

    async fn scheme_enrollments(&mut self, farmer_id: &str) -> StoreResult<Vec<Record>> {
        let rows = sqlx::query_scalar::<_, Value>(SCHEME_ENROLLMENTS_SQL)
            .bind(farmer_id)
            .fetch_all(&mut *self.conn)
            .await?;

        into_records(rows)
    }
}
