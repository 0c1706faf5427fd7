use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::labels::{AlertLevel, Stability, Trend, value_label};
use super::stats::Statistics;
use crate::error::AppError;
use crate::telemetry::Reading;

/// Analysis of one window of consecutive readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BatchAnalysis {
    /// 1-based position of the window
    pub(crate) batch_id: usize,
    pub(crate) start_timestamp: NaiveDateTime,
    pub(crate) end_timestamp: NaiveDateTime,
    pub(crate) record_count: usize,
    pub(crate) statistics: Statistics,
    pub(crate) raw_data: Vec<Reading>,
    pub(crate) value_label: String,
    pub(crate) trend: Trend,
    pub(crate) stability: Stability,
    pub(crate) alert_level: AlertLevel,
}

impl BatchAnalysis {
    fn from_window(batch_id: usize, window: &[Reading]) -> Option<Self> {
        let first = window.first()?;
        let last = window.last()?;
        let values: Vec<f64> = window.iter().map(|r| r.value).collect();
        let statistics = Statistics::from_values(&values)?;

        Some(Self {
            batch_id,
            start_timestamp: first.timestamp,
            end_timestamp: last.timestamp,
            record_count: window.len(),
            value_label: value_label(&statistics),
            trend: Trend::classify(&values),
            stability: Stability::classify(&statistics),
            alert_level: AlertLevel::classify(&statistics),
            statistics,
            raw_data: window.to_vec(),
        })
    }
}

/// Split readings into windows of `window_size` and analyze each one.
///
/// The last window may be shorter. Windows are analyzed in parallel; the
/// result keeps window order.
pub(crate) fn analyze_batches(
    readings: &[Reading],
    window_size: usize,
) -> Result<Vec<BatchAnalysis>, AppError> {
    if window_size == 0 {
        return Err(AppError::InvalidWindowSize);
    }

    let batches: Vec<BatchAnalysis> = readings
        .par_chunks(window_size)
        .enumerate()
        .filter_map(|(idx, window)| BatchAnalysis::from_window(idx + 1, window))
        .collect();

    tracing::debug!(
        readings = readings.len(),
        window_size,
        batches = batches.len(),
        "analyzed telemetry windows"
    );
    Ok(batches)
}
