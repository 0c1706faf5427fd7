//! Batch analysis of pump temperature readings
//!
//! Readings are cut into fixed-size windows; every window gets descriptive
//! statistics plus a set of labels (temperature band, trend, stability, alert).

mod batch;
mod labels;
mod report;
mod stats;
mod summary;

pub(crate) use batch::{BatchAnalysis, analyze_batches};
pub(crate) use labels::{AlertLevel, Stability, TemperatureBand, Trend};
pub(crate) use report::{AnalysisReport, DataSource, write_artifact};
pub(crate) use summary::ReportSummary;
