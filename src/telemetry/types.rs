use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One timestamped temperature sample from the pump sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Reading {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) value: f64,
}

/// Readings parsed from one input plus bookkeeping about the parse
#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) readings: Vec<Reading>,
    /// Rows dropped because the timestamp or value did not parse
    pub(crate) skipped: usize,
    pub(crate) timestamp_column: String,
    pub(crate) value_column: String,
}
