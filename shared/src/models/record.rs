//! Schemaless rows for tables whose column set is owned by the database

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::ParcelId;

/// A single row as an ordered mapping of column name to value.
///
/// Used for `crop_seasons`, `crop_history`, `digital_crop_survey` and the
/// scheme enrollment projection, whose columns are not declared here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style column insert, keeping insertion order
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The row's `parcel_id`, if present and integral
    pub fn parcel_id(&self) -> Option<ParcelId> {
        self.get("parcel_id")
            .and_then(Value::as_i64)
            .and_then(|id| ParcelId::try_from(id).ok())
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Only JSON objects are rows; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}
