use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

pub type Record = BTreeMap<String, StoreValue>;

/// A value as delivered by the document store. Nothing about its shape is
/// guaranteed; the normalizer is the only place that interprets it.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Timestamp(Timestamp),
    Date(DateTime<Utc>),
    Array(Vec<StoreValue>),
    Record(Record),
}

impl StoreValue {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            StoreValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StoreValue::Null => "null",
            StoreValue::Bool(_) => "bool",
            StoreValue::Number(_) => "number",
            StoreValue::String(_) => "string",
            StoreValue::Timestamp(_) => "timestamp",
            StoreValue::Date(_) => "date",
            StoreValue::Array(_) => "array",
            StoreValue::Record(_) => "record",
        }
    }
}

/// The store's native timestamp: seconds since the epoch plus a nanosecond
/// remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanoseconds: u32) -> Self {
        Timestamp { seconds, nanoseconds }
    }

    /// `None` when the instant is outside chrono's representable range.
    pub fn to_date(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.seconds, self.nanoseconds)
    }
}

impl From<Value> for StoreValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StoreValue::Null,
            Value::Bool(flag) => StoreValue::Bool(flag),
            Value::Number(number) => number
                .as_f64()
                .map(StoreValue::Number)
                .unwrap_or(StoreValue::Null),
            Value::String(text) => StoreValue::String(text),
            Value::Array(items) => {
                StoreValue::Array(items.into_iter().map(StoreValue::from).collect())
            }
            Value::Object(map) => {
                if let Some(timestamp) = timestamp_from_object(&map) {
                    return StoreValue::Timestamp(timestamp);
                }
                StoreValue::Record(
                    map.into_iter()
                        .map(|(key, value)| (key, StoreValue::from(value)))
                        .collect(),
                )
            }
        }
    }
}

/// Serialized timestamps show up either as `{seconds, nanoseconds}` (client
/// SDK) or `{_seconds, _nanoseconds}` (admin SDK).
fn timestamp_from_object(map: &serde_json::Map<String, Value>) -> Option<Timestamp> {
    if map.len() != 2 {
        return None;
    }
    for (seconds_key, nanos_key) in [("seconds", "nanoseconds"), ("_seconds", "_nanoseconds")] {
        if let (Some(seconds), Some(nanos)) = (map.get(seconds_key), map.get(nanos_key)) {
            let seconds = seconds.as_i64()?;
            let nanos = u32::try_from(nanos.as_u64()?).ok()?;
            return Some(Timestamp::new(seconds, nanos));
        }
    }
    None
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Permission denied by the document store")]
    PermissionDenied,
    #[error("Document store unavailable: {0}")]
    Unavailable(String),
    #[error("Document store initialization failed: {0}")]
    Initialization(String),
}

impl StoreError {
    /// i18n key of the message shown to the user.
    pub fn message_key(&self) -> &'static str {
        match self {
            StoreError::PermissionDenied => "store_permission_denied",
            StoreError::Unavailable(_) => "store_unavailable",
            StoreError::Initialization(_) => "store_init_error",
        }
    }
}

/// One callback of the live query.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    Records(StoreValue),
    Failed(StoreError),
}
