use std::fmt::Write;

use comfy_table::{Cell, Color};

use super::format::{
    alert_color, create_styled_table, format_percent, format_temp, format_timestamp, header_cell,
    right_cell, sparkline, styled_cell,
};
use crate::analysis::{AlertLevel, AnalysisReport, BatchAnalysis, ReportSummary, Stability, Trend};
use crate::consts::{CAUTION_THRESHOLD, DANGER_THRESHOLD};

const SPARK_WIDTH: usize = 60;

fn section(out: &mut String, title: &str, body: impl std::fmt::Display) {
    let _ = writeln!(out, "\n  {title}\n");
    let _ = writeln!(out, "{body}");
}

/// Key figures: batches, window, critical count, temperatures, period
pub(crate) fn render_overview(summary: &ReportSummary, use_color: bool) -> String {
    let critical = summary.critical_batches.len();
    let critical_color = if use_color && critical > 0 {
        Some(Color::Red)
    } else {
        None
    };

    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Metric", use_color), header_cell("Value", use_color)]);
    table.add_row(vec![Cell::new("Data source"), Cell::new(summary.data_source.as_str())]);
    table.add_row(vec![
        Cell::new("Batches"),
        right_cell(&summary.total_batches.to_string(), None, false),
    ]);
    table.add_row(vec![
        Cell::new("Window size"),
        right_cell(&summary.window_size.to_string(), None, false),
    ]);
    table.add_row(vec![
        Cell::new("Critical batches"),
        right_cell(&critical.to_string(), critical_color, critical > 0),
    ]);
    table.add_row(vec![
        Cell::new("Average temperature"),
        right_cell(&format_temp(summary.avg_temperature), None, false),
    ]);
    table.add_row(vec![
        Cell::new("Highest temperature"),
        right_cell(&format_temp(summary.max_temperature), None, false),
    ]);
    table.add_row(vec![
        Cell::new("Lowest temperature"),
        right_cell(&format_temp(summary.min_temperature), None, false),
    ]);
    table.add_row(vec![
        Cell::new("Period"),
        Cell::new(format!(
            "{} ~ {}",
            format_timestamp(&summary.period_start),
            format_timestamp(&summary.period_end)
        )),
    ]);

    let mut out = String::new();
    section(&mut out, "Water Pump Overview", table);
    out
}

fn render_trend(report: &AnalysisReport, use_color: bool) -> String {
    let c = use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Batch", c),
        header_cell("Start", c),
        header_cell("Mean", c),
        header_cell("Min", c),
        header_cell("Max", c),
        header_cell("Label", c),
        header_cell("Trend", c),
        header_cell("Alert", c),
    ]);
    for batch in &report.analysis_results {
        let s = &batch.statistics;
        let color = alert_color(batch.alert_level, use_color);
        table.add_row(vec![
            right_cell(&batch.batch_id.to_string(), None, false),
            Cell::new(format_timestamp(&batch.start_timestamp)),
            right_cell(&format_temp(s.mean), None, false),
            right_cell(&format_temp(s.min), None, false),
            right_cell(&format_temp(s.max), None, false),
            Cell::new(&batch.value_label),
            Cell::new(batch.trend.as_str()),
            styled_cell(batch.alert_level.as_str(), color, batch.alert_level.is_critical()),
        ]);
    }

    let means: Vec<f64> = report.analysis_results.iter().map(|b| b.statistics.mean).collect();
    let mut out = String::new();
    section(&mut out, "Temperature Trend", table);
    let _ = writeln!(out, "  Batch means  {}", sparkline(&means, SPARK_WIDTH));
    out
}

fn count_table<'a>(
    title: &str,
    rows: impl Iterator<Item = (&'a str, usize, Option<Color>)>,
    total: usize,
    use_color: bool,
) -> String {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell(title, use_color),
        header_cell("Batches", use_color),
        header_cell("Share", use_color),
    ]);
    for (name, count, color) in rows {
        table.add_row(vec![
            styled_cell(name, color, false),
            right_cell(&count.to_string(), None, false),
            right_cell(&format_percent(count, total), None, false),
        ]);
    }
    table.to_string()
}

fn render_distributions(summary: &ReportSummary, use_color: bool) -> String {
    let total = summary.total_batches;
    let alerts = AlertLevel::ALL
        .iter()
        .map(|&l| (l.as_str(), summary.alert_count(l), alert_color(l, use_color)));
    let trends = Trend::ALL
        .iter()
        .map(|&t| (t.as_str(), summary.trend_count(t), None));
    let stability = Stability::ALL
        .iter()
        .map(|&s| (s.as_str(), summary.stability_count(s), None));
    let labels = summary
        .labels_by_count()
        .into_iter()
        .map(|(label, count)| (label, count, None));

    let mut out = String::new();
    section(&mut out, "Alert Distribution", count_table("Alert", alerts, total, use_color));
    section(&mut out, "Trend & Stability", count_table("Trend", trends, total, use_color));
    let _ = writeln!(out, "{}", count_table("Stability", stability, total, use_color));
    section(&mut out, "Label Distribution", count_table("Label", labels, total, use_color));
    out
}

/// Overview, per-batch trend and distribution tables
pub(crate) fn render_dashboard(
    report: &AnalysisReport,
    summary: &ReportSummary,
    use_color: bool,
) -> String {
    let mut out = render_overview(summary, use_color);
    out.push_str(&render_trend(report, use_color));
    out.push_str(&render_distributions(summary, use_color));
    if !summary.critical_batches.is_empty() {
        let ids: Vec<String> = summary
            .critical_batches
            .iter()
            .map(|c| c.batch_id.to_string())
            .collect();
        let _ = writeln!(
            out,
            "\n  Critical batches: {} (use --batch N for details)",
            ids.join(", ")
        );
    }
    out
}

/// One batch: info, statistics, reading sparkline and threshold counts
pub(crate) fn render_batch_detail(batch: &BatchAnalysis, use_color: bool) -> String {
    let s = &batch.statistics;
    let c = use_color;

    let mut info = create_styled_table();
    info.set_header(vec![header_cell("Field", c), header_cell("Value", c)]);
    info.add_row(vec![Cell::new("Start"), Cell::new(format_timestamp(&batch.start_timestamp))]);
    info.add_row(vec![Cell::new("End"), Cell::new(format_timestamp(&batch.end_timestamp))]);
    info.add_row(vec![
        Cell::new("Readings"),
        right_cell(&batch.record_count.to_string(), None, false),
    ]);
    info.add_row(vec![Cell::new("Label"), Cell::new(&batch.value_label)]);
    info.add_row(vec![Cell::new("Trend"), Cell::new(batch.trend.as_str())]);
    info.add_row(vec![Cell::new("Stability"), Cell::new(batch.stability.as_str())]);
    info.add_row(vec![
        Cell::new("Alert"),
        styled_cell(
            batch.alert_level.as_str(),
            alert_color(batch.alert_level, use_color),
            batch.alert_level.is_critical(),
        ),
    ]);

    let mut stats = create_styled_table();
    stats.set_header(vec![
        header_cell("Mean", c),
        header_cell("Median", c),
        header_cell("Std", c),
        header_cell("Min", c),
        header_cell("Max", c),
        header_cell("Range", c),
    ]);
    stats.add_row(vec![
        right_cell(&format_temp(s.mean), None, false),
        right_cell(&format_temp(s.median), None, false),
        right_cell(&format!("{:.2}", s.std), None, false),
        right_cell(&format_temp(s.min), None, false),
        right_cell(&format_temp(s.max), None, false),
        right_cell(&format!("{:.1}", s.range), None, false),
    ]);

    let values: Vec<f64> = batch.raw_data.iter().map(|r| r.value).collect();
    let above_caution = values.iter().filter(|&&v| v > CAUTION_THRESHOLD).count();
    let above_danger = values.iter().filter(|&&v| v > DANGER_THRESHOLD).count();

    let mut out = String::new();
    section(&mut out, &format!("Batch {} Detail", batch.batch_id), info);
    section(&mut out, "Statistics", stats);
    let _ = writeln!(out, "  Readings  {}", sparkline(&values, SPARK_WIDTH));
    let _ = writeln!(
        out,
        "  Above caution ({}): {above_caution}   Above danger ({}): {above_danger}",
        format_temp(CAUTION_THRESHOLD),
        format_temp(DANGER_THRESHOLD)
    );
    out
}
