use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::batch::BatchAnalysis;
use crate::error::AppError;
use crate::utils::{file_stamp, now_local};

/// Where the analyzed readings came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DataSource {
    WaterPumpTemperatureSensor,
    CsvFile,
    SampleData,
    #[default]
    JsonReport,
}

impl DataSource {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            DataSource::WaterPumpTemperatureSensor => "water_pump_temperature_sensor",
            DataSource::CsvFile => "csv_file",
            DataSource::SampleData => "sample_data",
            DataSource::JsonReport => "json_report",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Metadata {
    pub(crate) analysis_date: NaiveDateTime,
    pub(crate) total_batches: usize,
    pub(crate) window_size: usize,
    pub(crate) data_source: DataSource,
}

/// The analysis artifact shared by the analyzer, dashboard and chatbots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AnalysisReport {
    pub(crate) metadata: Metadata,
    pub(crate) analysis_results: Vec<BatchAnalysis>,
}

impl AnalysisReport {
    pub(crate) fn new(
        batches: Vec<BatchAnalysis>,
        window_size: usize,
        data_source: DataSource,
    ) -> Self {
        Self {
            metadata: Metadata {
                analysis_date: now_local(),
                total_batches: batches.len(),
                window_size,
                data_source,
            },
            analysis_results: batches,
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let report: Self =
            serde_json::from_str(&content).map_err(|source| AppError::InvalidReport {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(
            path = %path.display(),
            batches = report.analysis_results.len(),
            "loaded analysis report"
        );
        Ok(report)
    }

    /// Write the report as `<dir>/<prefix>_<stamp>.json`
    pub(crate) fn save(&self, dir: &Path, prefix: &str) -> Result<PathBuf, AppError> {
        let json = serde_json::to_string_pretty(self)?;
        write_artifact(dir, prefix, "json", &json)
    }

    pub(crate) fn batch(&self, id: usize) -> Result<&BatchAnalysis, AppError> {
        self.analysis_results
            .iter()
            .find(|b| b.batch_id == id)
            .ok_or(AppError::UnknownBatch {
                id,
                total: self.analysis_results.len(),
            })
    }
}

/// Write `contents` to `<dir>/<prefix>_<YYYYMMDD_HHMMSS>.<ext>`, creating `dir`
pub(crate) fn write_artifact(
    dir: &Path,
    prefix: &str,
    ext: &str,
    contents: &str,
) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir).map_err(|source| AppError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("{prefix}_{}.{ext}", file_stamp(now_local())));
    fs::write(&path, contents).map_err(|source| AppError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "wrote artifact");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_batches;
    use crate::telemetry::Reading;
    use chrono::{Duration, NaiveDate};

    fn report() -> AnalysisReport {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let readings: Vec<Reading> = (0..30)
            .map(|i| Reading {
                timestamp: start + Duration::minutes(10 * i),
                value: 50.0 + i as f64,
            })
            .collect();
        let batches = analyze_batches(&readings, 10).unwrap();
        AnalysisReport::new(batches, 10, DataSource::CsvFile)
    }

    #[test]
    fn json_field_names() {
        let value = serde_json::to_value(report()).unwrap();
        assert_eq!(value["metadata"]["total_batches"], 3);
        assert_eq!(value["metadata"]["data_source"], "csv_file");
        let first = &value["analysis_results"][0];
        assert_eq!(first["batch_id"], 1);
        assert_eq!(first["start_timestamp"], "2025-03-01T08:00:00");
        assert_eq!(first["raw_data"][0]["value"], 50.0);
        assert!(first["statistics"]["median"].is_number());
        assert_eq!(first["trend"], "rising");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let original = report();
        let path = original.save(&dir.path().join("out"), "csv_analysis").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("csv_analysis_") && name.ends_with(".json"));

        let loaded = AnalysisReport::load(&path).unwrap();
        assert_eq!(loaded.analysis_results, original.analysis_results);
        assert_eq!(loaded.metadata.data_source, DataSource::CsvFile);
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"metadata\": 3}").unwrap();
        assert!(matches!(
            AnalysisReport::load(&path),
            Err(AppError::InvalidReport { .. })
        ));
    }

    #[test]
    fn batch_lookup() {
        let r = report();
        assert_eq!(r.batch(2).unwrap().batch_id, 2);
        assert!(matches!(
            r.batch(7),
            Err(AppError::UnknownBatch { id: 7, total: 3 })
        ));
    }
}
