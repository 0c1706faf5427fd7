use std::fmt::Write;

use super::format::format_percent;
use crate::analysis::{AlertLevel, AnalysisReport, ReportSummary};

/// Plain-text summary written by `--export report`
pub(crate) fn render_text_report(report: &AnalysisReport, summary: &ReportSummary) -> String {
    let meta = &report.metadata;
    let mut out = String::new();

    let _ = writeln!(out, "Water Pump Temperature Analysis Report");
    let _ = writeln!(out, "======================================\n");

    let _ = writeln!(out, "Analysis info");
    let _ = writeln!(out, "-------------");
    let _ = writeln!(out, "- Analysis date: {}", meta.analysis_date.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "- Data source: {}", meta.data_source);
    let _ = writeln!(out, "- Total batches: {}", summary.total_batches);
    let _ = writeln!(out, "- Window size: {} readings", meta.window_size);
    let _ = writeln!(
        out,
        "- Period: {} ~ {}\n",
        summary.period_start.format("%Y-%m-%d %H:%M"),
        summary.period_end.format("%Y-%m-%d %H:%M")
    );

    let _ = writeln!(out, "Temperature statistics");
    let _ = writeln!(out, "----------------------");
    let _ = writeln!(out, "- Average temperature: {:.1}°C", summary.avg_temperature);
    let _ = writeln!(out, "- Highest temperature: {:.1}°C", summary.max_temperature);
    let _ = writeln!(out, "- Lowest temperature: {:.1}°C\n", summary.min_temperature);

    let _ = writeln!(out, "Alert level distribution");
    let _ = writeln!(out, "------------------------");
    for &level in AlertLevel::ALL {
        let count = summary.alert_count(level);
        let _ = writeln!(
            out,
            "- {level}: {count} ({})",
            format_percent(count, summary.total_batches)
        );
    }

    if !summary.critical_batches.is_empty() {
        let _ = writeln!(out, "\nWarning/danger batches");
        let _ = writeln!(out, "----------------------");
        for batch in &summary.critical_batches {
            let _ = writeln!(
                out,
                "Batch {}: {:.1}°C ({})",
                batch.batch_id, batch.mean, batch.alert_level
            );
        }
    }
    out
}
