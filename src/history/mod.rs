// ABOUTME: History module: the append-only log of naturally finished sessions.
// ABOUTME: Records live as one JSON list under a fixed key in the key-value store.

pub mod export;
pub mod report;

pub use export::format_minutes;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Store key the history list is saved under.
pub const HISTORY_KEY: &str = "stats";

/// Workspace label used when the environment has no name.
pub const UNKNOWN_WORKSPACE: &str = "unknown";

/// Summary of one completed session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    #[serde(rename = "duration")]
    duration_minutes: f64,
    workspace_name: String,
    #[serde(rename = "startDateTime")]
    start_time: DateTime<Utc>,
    #[serde(rename = "endDateTime")]
    end_time: DateTime<Utc>,
}

impl HistoryRecord {
    /// Build a record. `end_time` earlier than `start_time` is clamped up to `start_time`.
    pub fn new(
        duration_minutes: f64,
        workspace_name: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            duration_minutes,
            workspace_name: workspace_name.into(),
            start_time,
            end_time: end_time.max(start_time),
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    pub fn workspace_name(&self) -> &str {
        &self.workspace_name
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }
}

/// Append-only list of history records backed by a single store slot.
///
/// Every mutation is a read-modify-write of the whole list; callers are
/// expected to be the only writer at a time.
#[derive(Clone)]
pub struct HistoryLog {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl HistoryLog {
    /// History log under the default key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, HISTORY_KEY)
    }

    /// History log under a custom key.
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Add a record to the end of the list.
    pub fn append(&self, record: HistoryRecord) -> Result<(), StoreError> {
        let mut records = self.all()?;
        records.push(record);
        tracing::debug!(key = %self.key, count = records.len(), "saving history");
        self.write(&records)
    }

    /// All records in insertion order. A missing slot is an empty history.
    pub fn all(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        match self.store.get(&self.key)? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Shape {
                key: self.key.clone(),
                source,
            }),
        }
    }

    /// Replace the history with an empty list.
    pub fn clear(&self) -> Result<(), StoreError> {
        tracing::info!(key = %self.key, "clearing history");
        self.write(&[])
    }

    fn write(&self, records: &[HistoryRecord]) -> Result<(), StoreError> {
        let value = serde_json::to_value(records).map_err(|source| StoreError::Shape {
            key: self.key.clone(),
            source,
        })?;
        self.store.set(&self.key, value)
    }
}
