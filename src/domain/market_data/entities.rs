pub use super::value_objects::{DEFAULT_SNAPSHOT, IndexName, IndexSnapshot, Quote, TimeLabel};
use crate::domain::errors::{FetchFailure, FetchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Latest snapshot per index, keyed by the payload's wire key. Kept verbatim:
/// unknown keys survive, missing ones read as [`DEFAULT_SNAPSHOT`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentIndices(BTreeMap<String, IndexSnapshot>);

impl Default for CurrentIndices {
    fn default() -> Self {
        Self::new(IndexName::iter().map(|name| (name.key().to_string(), DEFAULT_SNAPSHOT)).collect())
    }
}

impl CurrentIndices {
    pub fn new(entries: BTreeMap<String, IndexSnapshot>) -> Self {
        Self(entries)
    }

    pub fn get(&self, name: IndexName) -> Option<&IndexSnapshot> {
        self.0.get(name.key())
    }

    pub fn snapshot_or_default(&self, name: IndexName) -> IndexSnapshot {
        self.get(name).cloned().unwrap_or(DEFAULT_SNAPSHOT)
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, name: IndexName, snapshot: IndexSnapshot) {
        self.0.insert(name.key().to_string(), snapshot);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Five parallel sequences; index `i` across all of them is one time bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalSeries {
    pub datetime: Vec<TimeLabel>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl HistoricalSeries {
    pub fn len(&self) -> usize {
        self.datetime.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datetime.is_empty()
    }

    pub fn is_aligned(&self) -> bool {
        let len = self.datetime.len();
        self.open.len() == len && self.high.len() == len && self.low.len() == len && self.close.len() == len
    }

    pub fn ensure_aligned(&self) -> FetchResult<()> {
        if self.is_aligned() {
            return Ok(());
        }
        Err(FetchFailure::MisalignedSeries {
            datetime: self.datetime.len(),
            open: self.open.len(),
            high: self.high.len(),
            low: self.low.len(),
            close: self.close.len(),
        })
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, datetime: impl Into<TimeLabel>, open: f64, high: f64, low: f64, close: f64) {
        self.datetime.push(datetime.into());
        self.open.push(open);
        self.high.push(high);
        self.low.push(low);
        self.close.push(close);
    }
}

/// Body of `GET /api/stock-data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockPayload {
    pub current: CurrentIndices,
    #[serde(default)]
    pub historical: HistoricalSeries,
}

impl StockPayload {
    /// Decode and shape-check a response body.
    pub fn from_json(body: &str) -> FetchResult<Self> {
        let payload: StockPayload =
            serde_json::from_str(body).map_err(|e| FetchFailure::Decode(e.to_string()))?;
        payload.historical.ensure_aligned()?;
        Ok(payload)
    }
}
