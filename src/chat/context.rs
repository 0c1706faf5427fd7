use std::fmt::Write;

use crate::analysis::{AlertLevel, AnalysisReport, ReportSummary, Stability, Trend};

/// System message sent with every LLM request
pub(crate) const SYSTEM_PROMPT: &str = "You are an expert analyst of industrial water pump \
temperature data. You give plant operators accurate, practical advice grounded in the \
analysis data you are given.";

const MAX_CRITICAL: usize = 5;
const RECENT_BATCHES: usize = 5;

fn pct(count: usize, summary: &ReportSummary) -> f64 {
    summary.ratio(count) * 100.0
}

/// Markdown prompt: analysis context followed by the question and answer guidelines
pub(crate) fn build_prompt(report: &AnalysisReport, summary: &ReportSummary, question: &str) -> String {
    let mut out = String::new();
    let date = |t: &chrono::NaiveDateTime| t.format("%Y-%m-%d").to_string();
    let minute = |t: &chrono::NaiveDateTime| t.format("%Y-%m-%d %H:%M").to_string();

    let _ = writeln!(
        out,
        "Answer the user's question using the water pump temperature analysis below.\n"
    );
    let _ = writeln!(out, "## Data overview");
    let _ = writeln!(
        out,
        "- Analysis period: {} ~ {}",
        date(&summary.period_start),
        date(&summary.period_end)
    );
    let _ = writeln!(out, "- Total batches: {}", summary.total_batches);
    let _ = writeln!(out, "- Window size: {} readings", summary.window_size);
    let _ = writeln!(out, "- Data source: {}", summary.data_source);

    let _ = writeln!(out, "\n## Temperature statistics");
    let _ = writeln!(out, "- Average temperature: {:.1}°C", summary.avg_temperature);
    let _ = writeln!(out, "- Maximum temperature: {:.1}°C", summary.max_temperature);
    let _ = writeln!(out, "- Minimum temperature: {:.1}°C", summary.min_temperature);

    let _ = writeln!(out, "\n## Alert level distribution");
    for &level in AlertLevel::ALL {
        let count = summary.alert_count(level);
        let _ = writeln!(out, "- {level}: {count} ({:.1}%)", pct(count, summary));
    }

    let _ = writeln!(out, "\n## Trend distribution");
    for &trend in Trend::ALL {
        let _ = writeln!(out, "- {trend}: {}", summary.trend_count(trend));
    }

    let _ = writeln!(out, "\n## Stability distribution");
    for &stability in Stability::ALL {
        let _ = writeln!(out, "- {stability}: {}", summary.stability_count(stability));
    }

    let _ = writeln!(out, "\n## Critical batches");
    if summary.critical_batches.is_empty() {
        let _ = writeln!(out, "No batches at warning or danger level.");
    } else {
        let _ = writeln!(out, "Warning/danger batches: {}", summary.critical_batches.len());
        for batch in summary.critical_batches.iter().take(MAX_CRITICAL) {
            let label = report
                .analysis_results
                .iter()
                .find(|b| b.batch_id == batch.batch_id)
                .map_or("", |b| b.value_label.as_str());
            let _ = writeln!(
                out,
                "- Batch {}: {:.1}°C ({}, {label})",
                batch.batch_id, batch.mean, batch.alert_level
            );
        }
    }

    let _ = writeln!(out, "\n## Recent batches");
    let results = &report.analysis_results;
    for batch in &results[results.len().saturating_sub(RECENT_BATCHES)..] {
        let s = &batch.statistics;
        let _ = writeln!(out, "\nBatch {}:", batch.batch_id);
        let _ = writeln!(out, "- Start: {}", minute(&batch.start_timestamp));
        let _ = writeln!(out, "- Mean: {:.1}°C", s.mean);
        let _ = writeln!(out, "- Range: {:.1}°C ~ {:.1}°C", s.min, s.max);
        let _ = writeln!(out, "- Std dev: {:.1}°C", s.std);
        let _ = writeln!(out, "- Label: {}", batch.value_label);
        let _ = writeln!(out, "- Trend: {}", batch.trend);
        let _ = writeln!(out, "- Stability: {}", batch.stability);
        let _ = writeln!(out, "- Alert level: {}", batch.alert_level);
    }

    let _ = writeln!(out, "\n## User question\n{}", question.trim());
    let _ = write!(
        out,
        "\n## Answer guidelines\n\
         1. Answer from the point of view of an on-site plant operator.\n\
         2. Back every claim with the numbers above.\n\
         3. Separate immediate actions from long-term improvements.\n\
         4. Put safety-related issues first.\n\
         5. Keep a friendly, professional tone.\n"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DataSource, analyze_batches};
    use crate::telemetry::Reading;
    use chrono::{Duration, NaiveDate};

    fn fixture(values: &[f64], window: usize) -> (AnalysisReport, ReportSummary) {
        let start = NaiveDate::from_ymd_opt(2025, 4, 2)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        let readings: Vec<Reading> = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Reading {
                timestamp: start + Duration::minutes(10 * i as i64),
                value,
            })
            .collect();
        let report = AnalysisReport::new(
            analyze_batches(&readings, window).unwrap(),
            window,
            DataSource::CsvFile,
        );
        let summary = ReportSummary::from_report(&report).unwrap();
        (report, summary)
    }

    #[test]
    fn prompt_contains_context_and_question() {
        let (report, summary) = fixture(&[50.0, 51.0, 88.0, 93.0], 2);
        let prompt = build_prompt(&report, &summary, "  Is the pump overheating? ");

        assert!(prompt.contains("## Data overview"));
        assert!(prompt.contains("- Data source: csv_file"));
        assert!(prompt.contains("- Total batches: 2"));
        assert!(prompt.contains("- danger: 1 (50.0%)"));
        assert!(prompt.contains("- Batch 2: 90.5°C (danger, overheat_moderate_varying)"));
        assert!(prompt.contains("## User question\nIs the pump overheating?\n"));
        assert!(prompt.contains("## Answer guidelines"));
    }

    #[test]
    fn only_recent_batches_are_detailed() {
        let values: Vec<f64> = (0..8).map(|i| 50.0 + i as f64 * 0.01).collect();
        let (report, summary) = fixture(&values, 1);
        let prompt = build_prompt(&report, &summary, "q");
        assert!(!prompt.contains("\nBatch 3:"));
        assert!(prompt.contains("\nBatch 4:"));
        assert!(prompt.contains("\nBatch 8:"));
        assert!(prompt.contains("No batches at warning or danger level."));
    }
}
