use shared::{HistoryId, HistoryRecord};
use std::future::Future;

use crate::error::{HistoryError, TransportError};
use crate::prediction::PredictionResult;

const MAX_ID_LEN: usize = 128;

/// Read-only source of past diagnoses.
pub trait HistoryStore {
    /// Summaries, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<HistoryRecord>, TransportError>>;
    fn find(&self, id: &HistoryId) -> impl Future<Output = Result<Option<HistoryRecord>, TransportError>>;
}

/// Fixed in-memory history, used until records are served by a backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    records: Vec<HistoryRecord>,
}

impl InMemoryHistory {
    pub fn new(mut records: Vec<HistoryRecord>) -> Self {
        records.sort_by(|a, b| b.diagnosed_at.cmp(&a.diagnosed_at));
        Self { records }
    }
}

impl HistoryStore for InMemoryHistory {
    async fn list(&self) -> Result<Vec<HistoryRecord>, TransportError> {
        Ok(self.records.clone())
    }

    async fn find(&self, id: &HistoryId) -> Result<Option<HistoryRecord>, TransportError> {
        Ok(self.records.iter().find(|record| &record.id == id).cloned())
    }
}

pub fn parse_history_id(raw: &str) -> Result<HistoryId, HistoryError> {
    let valid = !raw.is_empty()
        && raw.len() <= MAX_ID_LEN
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    if valid {
        Ok(HistoryId::from(raw.to_string()))
    } else {
        Err(HistoryError::InvalidId(raw.to_string()))
    }
}

impl From<&HistoryRecord> for PredictionResult {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            disease_id: record.disease_id.clone(),
            plant_type: record.plant_type,
            confidence: record.confidence,
            raw: serde_json::to_value(record).unwrap_or_else(|e| {
                log::warn!("Could not keep raw payload of history record {}: {}", record.id, e);
                serde_json::Value::Null
            }),
        }
    }
}
