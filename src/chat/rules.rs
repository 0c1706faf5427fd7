use std::fmt::Write;

use crate::analysis::{
    AlertLevel, AnalysisReport, BatchAnalysis, ReportSummary, Stability, TemperatureBand, Trend,
};

/// What a question is about, in matching priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Intent {
    Emergency,
    Overview,
    Temperature,
    Trend,
    Risk,
    Maintenance,
    Optimization,
    Help,
}

const EMERGENCY_WORDS: &[&str] = &["danger", "problem", "issue", "abnormal", "alert", "warning"];
const OVERVIEW_WORDS: &[&str] = &["overall", "summary", "overview", "status", "situation"];
const TEMPERATURE_WORDS: &[&str] = &[
    "temperature", "temp", "average", "mean", "highest", "lowest", "max", "min",
];
const TREND_WORDS: &[&str] = &["trend", "change", "pattern", "tendency"];
const RISK_WORDS: &[&str] = &["risk", "danger", "warning", "caution", "problem"];
const MAINTENANCE_WORDS: &[&str] = &["maintenance", "predict", "inspect", "service"];
const OPTIMIZATION_WORDS: &[&str] = &["efficien", "optimi", "improve", "performance"];

/// True when some word of `query` starts with one of `keywords`
fn mentions(words: &[&str], keywords: &[&str]) -> bool {
    words
        .iter()
        .any(|w| keywords.iter().any(|k| w.starts_with(k)))
}

impl Intent {
    pub(crate) fn detect(query: &str, has_danger: bool) -> Self {
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        if has_danger && mentions(&words, EMERGENCY_WORDS) {
            return Intent::Emergency;
        }
        let ordered = [
            (OVERVIEW_WORDS, Intent::Overview),
            (TEMPERATURE_WORDS, Intent::Temperature),
            (TREND_WORDS, Intent::Trend),
            (RISK_WORDS, Intent::Risk),
            (MAINTENANCE_WORDS, Intent::Maintenance),
            (OPTIMIZATION_WORDS, Intent::Optimization),
        ];
        ordered
            .into_iter()
            .find(|(keywords, _)| mentions(&words, keywords))
            .map_or(Intent::Help, |(_, intent)| intent)
    }
}

/// Keyword-driven answer computed from the report alone
pub(crate) fn answer(report: &AnalysisReport, summary: &ReportSummary, query: &str) -> String {
    let danger: Vec<&BatchAnalysis> = report
        .analysis_results
        .iter()
        .filter(|b| b.alert_level == AlertLevel::Danger)
        .collect();

    match Intent::detect(query, !danger.is_empty()) {
        Intent::Emergency => emergency(&danger),
        Intent::Overview => overview(summary),
        Intent::Temperature => temperature(report, summary),
        Intent::Trend => trend(summary),
        Intent::Risk => risk(report, summary),
        Intent::Maintenance => maintenance(summary),
        Intent::Optimization => optimization(summary),
        Intent::Help => help(query),
    }
}

fn pct(summary: &ReportSummary, count: usize) -> f64 {
    summary.ratio(count) * 100.0
}

fn emergency(danger: &[&BatchAnalysis]) -> String {
    let mut out = String::from("EMERGENCY: water pump overheating detected\n\n");
    for batch in danger {
        let _ = writeln!(out, "Danger - batch {}", batch.batch_id);
        let _ = writeln!(out, "- Max temperature: {:.1}°C", batch.statistics.max);
        let _ = writeln!(out, "- Mean temperature: {:.1}°C", batch.statistics.mean);
        let _ = writeln!(out, "- Started: {}", batch.start_timestamp.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out, "- Profile: {}\n", batch.value_label);
    }
    out.push_str(
        "Immediate actions\n\
         1. Stop the pump and run a safety inspection\n\
         2. Check coolant flow and temperature\n\
         3. Inspect the cooling filter and radiator\n\
         4. Check bearings and seals\n\
         5. Contact the on-site engineer now\n\n\
         Follow-up\n\
         - Put the maintenance crew on standby\n\
         - Restart only after the root cause is found\n",
    );
    out
}

fn overview(summary: &ReportSummary) -> String {
    let mut out = String::from("Water pump temperature overview\n\n");
    let _ = writeln!(
        out,
        "- Period: {} ~ {}",
        summary.period_start.format("%Y-%m-%d"),
        summary.period_end.format("%Y-%m-%d")
    );
    let _ = writeln!(out, "- Batches: {}", summary.total_batches);
    let _ = writeln!(out, "- Average temperature: {:.1}°C", summary.avg_temperature);
    let _ = writeln!(out, "- Highest temperature: {:.1}°C", summary.max_temperature);
    let _ = writeln!(out, "- Lowest temperature: {:.1}°C\n", summary.min_temperature);

    out.push_str("Alert levels\n");
    for &level in AlertLevel::ALL {
        let count = summary.alert_count(level);
        let _ = writeln!(out, "- {level}: {count} ({:.1}%)", pct(summary, count));
    }

    out.push_str("\nFindings\n");
    let critical = summary.critical_batches.len();
    if critical > 0 {
        let _ = writeln!(out, "- {critical} batch(es) at warning or danger level");
        out.push_str("- Inspect and act immediately\n");
    } else {
        out.push_str("- Operation is stable overall\n");
    }
    if summary.avg_temperature > 75.0 {
        out.push_str("- Average temperature is high; check cooling efficiency\n");
    }
    out
}

fn temperature(report: &AnalysisReport, summary: &ReportSummary) -> String {
    let mut out = String::from("Temperature breakdown\n\nBatches by mean temperature\n");
    for &band in TemperatureBand::ALL {
        let count = report
            .analysis_results
            .iter()
            .filter(|b| TemperatureBand::classify(b.statistics.mean) == band)
            .count();
        let range = match band {
            TemperatureBand::Low => "<40°C",
            TemperatureBand::Normal => "40-70°C",
            TemperatureBand::High => "70-85°C",
            TemperatureBand::Overheat => ">=85°C",
        };
        let _ = writeln!(out, "- {band} ({range}): {count} ({:.1}%)", pct(summary, count));
    }

    let _ = writeln!(out, "\nStatistics");
    let _ = writeln!(out, "- Overall average: {:.1}°C", summary.avg_temperature);
    let _ = writeln!(out, "- Highest reading: {:.1}°C", summary.max_temperature);
    let _ = writeln!(out, "- Lowest reading: {:.1}°C", summary.min_temperature);

    let hot: Vec<&BatchAnalysis> = report
        .analysis_results
        .iter()
        .filter(|b| b.statistics.mean > 80.0)
        .collect();
    if !hot.is_empty() {
        let _ = writeln!(out, "\nHot batches ({})", hot.len());
        for batch in hot.iter().take(3) {
            let _ = writeln!(
                out,
                "- Batch {}: {:.1}°C ({})",
                batch.batch_id, batch.statistics.mean, batch.value_label
            );
        }
    }
    out
}

fn trend(summary: &ReportSummary) -> String {
    let total = summary.total_batches as f64;
    let mut out = String::from("Temperature trends\n\nTrend distribution\n");
    for &t in Trend::ALL {
        let count = summary.trend_count(t);
        let _ = writeln!(out, "- {t}: {count} ({:.1}%)", pct(summary, count));
    }
    out.push_str("\nStability distribution\n");
    for &s in Stability::ALL {
        let count = summary.stability_count(s);
        let _ = writeln!(out, "- {s}: {count} ({:.1}%)", pct(summary, count));
    }

    out.push_str("\nInterpretation\n");
    let before = out.len();
    if summary.trend_count(Trend::Rising) as f64 > total * 0.3 {
        out.push_str("- Rising trends dominate; inspect the cooling system\n");
    }
    if summary.stability_count(Stability::Unstable) as f64 > total * 0.2 {
        out.push_str("- Many batches fluctuate strongly; review operating conditions\n");
    }
    if summary.trend_count(Trend::Flat) as f64 > total * 0.6 {
        out.push_str("- Temperature mostly holds steady; operation looks healthy\n");
    }
    if out.len() == before {
        out.push_str("- No dominant pattern across batches\n");
    }
    out
}

fn risk(report: &AnalysisReport, summary: &ReportSummary) -> String {
    let mut out = String::from("Risk assessment\n\n");
    if summary.critical_batches.is_empty() {
        out.push_str(
            "All clear\n\
             - No batches at warning or danger level\n\
             - Operating within the normal range\n",
        );
        return out;
    }

    let _ = writeln!(out, "Warning/danger batches: {}\n", summary.critical_batches.len());
    for critical in &summary.critical_batches {
        let label = report
            .analysis_results
            .iter()
            .find(|b| b.batch_id == critical.batch_id)
            .map_or("", |b| b.value_label.as_str());
        let _ = writeln!(out, "Batch {} ({})", critical.batch_id, critical.alert_level);
        let _ = writeln!(out, "- Mean temperature: {:.1}°C", critical.mean);
        let _ = writeln!(out, "- Max temperature: {:.1}°C", critical.max);
        let _ = writeln!(out, "- Profile: {label}");
        let _ = writeln!(out, "- Started: {}\n", critical.start_timestamp.format("%Y-%m-%d %H:%M"));
    }
    out.push_str(
        "Recommended actions\n\
         1. Find the cause of the hot batches (load, coolant, ambient temperature)\n\
         2. Inspect the cooling system (filter, pump, radiator)\n\
         3. Check lubrication of bearings and rotating parts\n\
         4. Verify temperature sensor accuracy\n",
    );
    out
}

fn maintenance(summary: &ReportSummary) -> String {
    let critical_ratio = summary.ratio(summary.critical_batches.len());
    let unstable_ratio = summary.ratio(summary.stability_count(Stability::Unstable));

    let mut out = String::from("Predictive maintenance\n\nPriorities\n");
    if critical_ratio > 0.2 {
        out.push_str(
            "1. Full cooling system inspection\n\
             - Replace coolant and check circulation\n\
             - Clean the radiator and check the fan\n\
             - Consider replacing the thermostat\n\n",
        );
    }
    if unstable_ratio > 0.3 {
        out.push_str(
            "2. Mechanical inspection\n\
             - Lubricate or replace bearings\n\
             - Check shaft alignment\n\
             - Check impeller balance\n\n",
        );
    }
    out.push_str(
        "3. Preventive maintenance\n\
         - Scheduled oil change\n\
         - Inspect seals and gaskets\n\
         - Inspect electrical connections\n\n\
         Recommended interval\n",
    );
    if summary.avg_temperature > 75.0 {
        out.push_str("- Short inspection: in 1 week\n- Scheduled maintenance: bring forward by 1 month\n");
    } else {
        out.push_str("- Routine inspection: in 2 weeks\n- Scheduled maintenance: keep the current cycle\n");
    }
    out
}

fn optimization(summary: &ReportSummary) -> String {
    let mut out = String::from("Optimization suggestions\n\nEnergy efficiency\n");
    if summary.avg_temperature > 70.0 {
        out.push_str(
            "- Better cooling efficiency can save energy\n\
             - Use variable-speed control to match load\n",
        );
    }
    out.push_str(
        "- Schedule run time away from peak hours\n\
         - Shorten warm-up time\n\n\
         Temperature control\n\
         - Target range: 50-65°C\n\
         - Automatic coolant temperature control\n\
         - Compensate for ambient temperature\n\n\
         Monitoring\n\
         - Real-time temperature alerts\n\
         - Trend-based prediction\n\
         - Multiple sensors for better accuracy\n",
    );
    out
}

fn help(query: &str) -> String {
    format!(
        "Water pump assistant\n\n\
         Your question: \"{}\"\n\n\
         I can help with:\n\
         - \"What is the overall status?\" - overall temperature analysis\n\
         - \"Show the temperature trend\" - change patterns\n\
         - \"Are there any risks?\" - risk check\n\
         - \"Plan the maintenance\" - predictive maintenance advice\n\
         - \"How can we improve efficiency?\" - optimization ideas\n\n\
         Ask a specific question for a more precise answer.",
        query.trim()
    )
}
