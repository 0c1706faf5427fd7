use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::labels::{AlertLevel, Stability, Trend};
use super::report::{AnalysisReport, DataSource};
use crate::error::AppError;

/// A batch whose alert level is warning or danger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CriticalBatch {
    pub(crate) batch_id: usize,
    pub(crate) alert_level: AlertLevel,
    pub(crate) start_timestamp: NaiveDateTime,
    pub(crate) mean: f64,
    pub(crate) max: f64,
}

/// Report-wide aggregates used by the dashboard and both chatbots
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReportSummary {
    pub(crate) data_source: DataSource,
    pub(crate) window_size: usize,
    pub(crate) total_batches: usize,
    pub(crate) period_start: NaiveDateTime,
    pub(crate) period_end: NaiveDateTime,
    /// Average of batch means
    pub(crate) avg_temperature: f64,
    pub(crate) max_temperature: f64,
    pub(crate) min_temperature: f64,
    pub(crate) alert_counts: BTreeMap<AlertLevel, usize>,
    pub(crate) trend_counts: BTreeMap<Trend, usize>,
    pub(crate) stability_counts: BTreeMap<Stability, usize>,
    pub(crate) label_counts: BTreeMap<String, usize>,
    pub(crate) critical_batches: Vec<CriticalBatch>,
}

fn zero_filled<K: Ord + Copy>(keys: &[K]) -> BTreeMap<K, usize> {
    keys.iter().map(|&k| (k, 0)).collect()
}

impl ReportSummary {
    pub(crate) fn from_report(report: &AnalysisReport) -> Result<Self, AppError> {
        let batches = &report.analysis_results;
        let (Some(first), Some(last)) = (batches.first(), batches.last()) else {
            return Err(AppError::EmptyReport);
        };

        let mut alert_counts = zero_filled(AlertLevel::ALL);
        let mut trend_counts = zero_filled(Trend::ALL);
        let mut stability_counts = zero_filled(Stability::ALL);
        let mut label_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut critical_batches = Vec::new();
        let mut mean_sum = 0.0;
        let mut max_temperature = f64::NEG_INFINITY;
        let mut min_temperature = f64::INFINITY;

        for batch in batches {
            let stats = &batch.statistics;
            mean_sum += stats.mean;
            max_temperature = max_temperature.max(stats.max);
            min_temperature = min_temperature.min(stats.min);

            *alert_counts.entry(batch.alert_level).or_default() += 1;
            *trend_counts.entry(batch.trend).or_default() += 1;
            *stability_counts.entry(batch.stability).or_default() += 1;
            *label_counts.entry(batch.value_label.clone()).or_default() += 1;

            if batch.alert_level.is_critical() {
                critical_batches.push(CriticalBatch {
                    batch_id: batch.batch_id,
                    alert_level: batch.alert_level,
                    start_timestamp: batch.start_timestamp,
                    mean: stats.mean,
                    max: stats.max,
                });
            }
        }

        Ok(Self {
            data_source: report.metadata.data_source,
            window_size: report.metadata.window_size,
            total_batches: batches.len(),
            period_start: first.start_timestamp,
            period_end: last.end_timestamp,
            avg_temperature: mean_sum / batches.len() as f64,
            max_temperature,
            min_temperature,
            alert_counts,
            trend_counts,
            stability_counts,
            label_counts,
            critical_batches,
        })
    }

    pub(crate) fn alert_count(&self, level: AlertLevel) -> usize {
        self.alert_counts.get(&level).copied().unwrap_or(0)
    }

    pub(crate) fn trend_count(&self, trend: Trend) -> usize {
        self.trend_counts.get(&trend).copied().unwrap_or(0)
    }

    pub(crate) fn stability_count(&self, stability: Stability) -> usize {
        self.stability_counts.get(&stability).copied().unwrap_or(0)
    }

    /// Share of all batches, 0.0..=1.0
    pub(crate) fn ratio(&self, count: usize) -> f64 {
        if self.total_batches == 0 {
            0.0
        } else {
            count as f64 / self.total_batches as f64
        }
    }

    /// Labels ordered by count (descending), then name
    pub(crate) fn labels_by_count(&self) -> Vec<(&str, usize)> {
        let mut labels: Vec<(&str, usize)> = self
            .label_counts
            .iter()
            .map(|(k, &v)| (k.as_str(), v))
            .collect();
        labels.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        labels
    }
}
